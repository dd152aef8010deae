//! Error types for native function resolution and hooking.

use crate::FunctionAddress;

/// Errors raised while resolving or hooking a native function.
///
/// Every one of these is fatal to the warm-up feature: without the hook,
/// rounds can't be kept alive during warm-up.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// A byte pattern that can never match anything (empty, or all
    /// wildcards), or pattern text that doesn't parse.
    #[error("invalid byte pattern: {0}")]
    InvalidPattern(String),

    /// The signature didn't resolve in the given binary.
    #[error("signature {signature} not found in {image}")]
    NotFound { signature: String, image: String },

    /// A hook was installed on an address already hooked with a
    /// different calling convention or argument list.
    #[error("function at {0} already hooked with a different signature")]
    SignatureMismatch(FunctionAddress),

    /// The host's detour mechanism refused the hook.
    #[error("hook install failed: {0}")]
    InstallFailed(String),
}
