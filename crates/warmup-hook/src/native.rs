//! Native function descriptions: where a function lives and how it is
//! called.

use std::fmt;

/// Absolute address of a native function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionAddress(pub usize);

impl fmt::Display for FunctionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Calling convention of a native function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Cdecl,
    StdCall,
    ThisCall,
    FastCall,
}

/// Type of one native argument or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Void,
    Bool,
    Int,
    Float,
    Pointer,
}

/// Calling convention plus argument and return types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeSignature {
    pub convention: Convention,
    pub args: &'static [DataType],
    pub ret: DataType,
}

/// `int CCSGameRules::TerminateRound(float delay, int reason, int unused)`,
/// called on the game-rules object (`this` is the first argument).
pub const TERMINATE_ROUND: NativeSignature = NativeSignature {
    convention: Convention::ThisCall,
    args: &[DataType::Pointer, DataType::Float, DataType::Int, DataType::Int],
    ret: DataType::Int,
};

/// A resolved native function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFunction {
    pub name: &'static str,
    pub address: FunctionAddress,
    pub signature: NativeSignature,
}

/// One argument value as seen by a pre-call hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg {
    Pointer(usize),
    Int(i32),
    Float(f32),
    Bool(bool),
}
