//! Native function interception for the warm-up plugin.
//!
//! The engine ends a round by calling a native routine the plugin can't
//! modify. This crate finds that routine and puts a pre-call hook in front
//! of it:
//!
//! 1. **Locate**: a [`Signature`] (byte pattern on Windows, exported
//!    symbol on Linux) is [`resolve`]d against a [`BinaryImage`].
//! 2. **Describe**: the address plus its [`NativeSignature`] make a
//!    [`NativeFunction`].
//! 3. **Hook**: a [`PreHook`] is installed through a [`HookHost`]. When
//!    it returns [`HookAction::Override`], the native body is skipped.
//!
//! [`TerminateRoundInterceptor`] is the one hook the plugin installs.

mod error;
mod host;
mod image;
mod interceptor;
mod native;
mod signature;

pub use error::HookError;
pub use host::{HookHost, HookTable};
pub use image::{BinaryImage, ModuleImage, resolve};
pub use interceptor::{
    HookAction, PhaseQuery, PreHook, SUPPRESS_ROUND_END, TerminateRoundInterceptor,
};
pub use native::{
    Arg, Convention, DataType, FunctionAddress, NativeFunction, NativeSignature, TERMINATE_ROUND,
};
pub use signature::{BytePattern, Platform, Signature, terminate_round};
