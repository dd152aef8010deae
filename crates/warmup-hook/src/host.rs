//! Installing hooks with the host's detour mechanism.

use std::collections::HashMap;

use tracing::info;

use crate::{Arg, FunctionAddress, HookAction, HookError, NativeFunction, PreHook};

/// The host's ability to put a pre-call hook in front of a native
/// function.
pub trait HookHost {
    /// Installs `hook` before `function`. Hooks stay installed for the
    /// life of the process.
    ///
    /// # Errors
    /// `HookError::SignatureMismatch` if the address is already hooked
    /// under another signature, `HookError::InstallFailed` if the detour
    /// can't be placed.
    fn install_pre_hook(
        &mut self,
        function: NativeFunction,
        hook: Box<dyn PreHook>,
    ) -> Result<(), HookError>;
}

struct Hooked {
    function: NativeFunction,
    hooks: Vec<Box<dyn PreHook>>,
}

/// In-process hook dispatch.
///
/// Native call sites (or their stand-ins) go through
/// [`HookTable::invoke`], which runs the installed pre-hooks and then the
/// body, unless a hook overrides the call.
#[derive(Default)]
pub struct HookTable {
    hooked: HashMap<FunctionAddress, Hooked>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything is hooked at `address`.
    pub fn is_hooked(&self, address: FunctionAddress) -> bool {
        self.hooked.contains_key(&address)
    }

    /// Number of pre-hooks installed at `address`.
    pub fn hook_count(&self, address: FunctionAddress) -> usize {
        self.hooked.get(&address).map_or(0, |h| h.hooks.len())
    }

    /// Calls the function at `address`: pre-hooks first, in install order.
    /// The first hook that returns [`HookAction::Override`] wins and
    /// `body` never runs.
    pub fn invoke<F>(&self, address: FunctionAddress, args: &[Arg], body: F) -> i32
    where
        F: FnOnce(&[Arg]) -> i32,
    {
        if let Some(hooked) = self.hooked.get(&address) {
            for hook in &hooked.hooks {
                if let HookAction::Override(value) = hook.pre_call(args) {
                    return value;
                }
            }
        }
        body(args)
    }
}

impl HookHost for HookTable {
    fn install_pre_hook(
        &mut self,
        function: NativeFunction,
        hook: Box<dyn PreHook>,
    ) -> Result<(), HookError> {
        let entry = self.hooked.entry(function.address).or_insert_with(|| Hooked {
            function,
            hooks: Vec::new(),
        });
        if entry.function.signature != function.signature {
            return Err(HookError::SignatureMismatch(function.address));
        }
        entry.hooks.push(hook);
        info!(
            name = function.name,
            address = %function.address,
            hooks = entry.hooks.len(),
            "pre-hook installed"
        );
        Ok(())
    }
}
