//! Loaded binaries and signature resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::{FunctionAddress, HookError, Signature};

/// A binary loaded into the process (e.g. the game's `server` module).
pub trait BinaryImage {
    /// Module name, for error messages.
    fn name(&self) -> &str;

    /// Load address of the first byte of [`bytes`](Self::bytes).
    fn base_address(&self) -> usize;

    /// The module's code, for pattern scans.
    fn bytes(&self) -> &[u8];

    /// Absolute address of an exported symbol.
    fn symbol(&self, name: &str) -> Option<usize>;
}

/// Resolves `signature` to a function address inside `image`.
///
/// Byte patterns resolve to the first match.
///
/// # Errors
/// `HookError::NotFound` if the pattern doesn't occur or the symbol isn't
/// exported.
pub fn resolve<I>(image: &I, signature: &Signature) -> Result<FunctionAddress, HookError>
where
    I: BinaryImage + ?Sized,
{
    let found = match signature {
        Signature::Pattern(pattern) => pattern
            .find_in(image.bytes())
            .map(|offset| image.base_address() + offset),
        Signature::Symbol(name) => image.symbol(name),
    };

    match found {
        Some(addr) => {
            let address = FunctionAddress(addr);
            debug!(image = image.name(), %signature, %address, "signature resolved");
            Ok(address)
        }
        None => Err(HookError::NotFound {
            signature: signature.to_string(),
            image: image.name().to_string(),
        }),
    }
}

/// An owned in-memory image: a byte buffer at a fixed base address plus a
/// symbol table of offsets.
#[derive(Debug, Clone)]
pub struct ModuleImage {
    name: String,
    base: usize,
    bytes: Vec<u8>,
    symbols: HashMap<String, usize>,
}

impl ModuleImage {
    pub fn new(name: impl Into<String>, base: usize, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            base,
            bytes,
            symbols: HashMap::new(),
        }
    }

    /// Adds an exported symbol at `offset` from the base.
    pub fn with_symbol(mut self, name: impl Into<String>, offset: usize) -> Self {
        self.symbols.insert(name.into(), offset);
        self
    }
}

impl BinaryImage for ModuleImage {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_address(&self) -> usize {
        self.base
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn symbol(&self, name: &str) -> Option<usize> {
        self.symbols.get(name).map(|off| self.base + off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BytePattern, Platform, terminate_round};

    #[test]
    fn test_resolve_pattern_adds_base() {
        let image = ModuleImage::new("server", 0x1000, vec![0x90, 0x90, 0x55, 0x8B, 0xEC]);
        let sig = Signature::Pattern(BytePattern::parse("55 8B EC").unwrap());
        assert_eq!(resolve(&image, &sig).unwrap(), FunctionAddress(0x1002));
    }

    #[test]
    fn test_resolve_symbol() {
        let image = ModuleImage::new("server", 0x4000, Vec::new())
            .with_symbol("_ZN12CCSGameRules14TerminateRoundEfi", 0x20);
        let address = resolve(&image, &terminate_round(Platform::Linux)).unwrap();
        assert_eq!(address, FunctionAddress(0x4020));
    }

    #[test]
    fn test_resolve_not_found_names_image() {
        let image = ModuleImage::new("server", 0, vec![0u8; 64]);
        let err = resolve(&image, &terminate_round(Platform::Windows)).unwrap_err();
        match err {
            HookError::NotFound { image, .. } => assert_eq!(image, "server"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
