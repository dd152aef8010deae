//! Pre-call hooks and the round-termination interceptor.

use tracing::trace;

use crate::Arg;

/// What a pre-call hook tells the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// Run the native body as usual.
    Continue,
    /// Skip the native body and return this value instead.
    Override(i32),
}

/// Logic that runs synchronously before a native function body.
///
/// Runs inline on the engine's calling thread, possibly very often, so
/// implementations must not block and should not allocate.
pub trait PreHook: Send + Sync + 'static {
    fn pre_call(&self, args: &[Arg]) -> HookAction;
}

/// Read-only view of whether the warm-up phase is running.
pub trait PhaseQuery: Send + Sync + 'static {
    fn is_active(&self) -> bool;
}

/// Value returned in place of `TerminateRound`'s body during warm-up.
pub const SUPPRESS_ROUND_END: i32 = 0;

/// Keeps rounds from ending while warm-up is active.
///
/// Stateless apart from its phase view: every call consults the phase
/// afresh.
#[derive(Debug, Clone)]
pub struct TerminateRoundInterceptor<Q> {
    phase: Q,
}

impl<Q: PhaseQuery> TerminateRoundInterceptor<Q> {
    pub fn new(phase: Q) -> Self {
        Self { phase }
    }
}

impl<Q: PhaseQuery> PreHook for TerminateRoundInterceptor<Q> {
    fn pre_call(&self, _args: &[Arg]) -> HookAction {
        if self.phase.is_active() {
            trace!("round termination suppressed during warm-up");
            HookAction::Override(SUPPRESS_ROUND_END)
        } else {
            HookAction::Continue
        }
    }
}
