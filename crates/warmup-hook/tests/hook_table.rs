//! Integration tests: resolving TerminateRound and dispatching through the
//! hook table.

use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use warmup_hook::{
    Arg, Convention, DataType, FunctionAddress, HookAction, HookError, HookHost, HookTable,
    ModuleImage, NativeFunction, NativeSignature, PhaseQuery, Platform, PreHook, SUPPRESS_ROUND_END,
    TERMINATE_ROUND, TerminateRoundInterceptor, resolve, terminate_round,
};

#[derive(Clone)]
struct Flag(Arc<AtomicBool>);

impl PhaseQuery for Flag {
    fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn windows_image() -> ModuleImage {
    let mut bytes = vec![0xCCu8; 32];
    bytes.extend_from_slice(&[
        0x55, 0x8B, 0xEC, 0x83, 0xEC, 0x18, 0x8B, 0x45, 0x0C, 0x53, 0x56, 0x57, 0x33, 0xF6,
    ]);
    bytes.extend_from_slice(&[0xC3; 8]);
    ModuleImage::new("server.dll", 0x1000_0000, bytes)
}

fn terminate_round_fn(address: FunctionAddress) -> NativeFunction {
    NativeFunction {
        name: "TerminateRound",
        address,
        signature: TERMINATE_ROUND,
    }
}

const ARGS: [Arg; 4] = [Arg::Pointer(0x2000), Arg::Float(7.0), Arg::Int(8), Arg::Int(0)];

#[test]
fn test_windows_pattern_resolves_past_padding() {
    let address = resolve(&windows_image(), &terminate_round(Platform::Windows)).unwrap();
    assert_eq!(address, FunctionAddress(0x1000_0000 + 32));
}

#[test]
fn test_linux_symbol_missing_is_fatal() {
    let image = ModuleImage::new("server_srv.so", 0x4000, vec![0; 16]);
    let err = resolve(&image, &terminate_round(Platform::Linux)).unwrap_err();
    assert!(matches!(err, HookError::NotFound { .. }));
    assert!(err.to_string().contains("_ZN12CCSGameRules14TerminateRoundEfi"));
}

#[test]
fn test_interceptor_skips_body_while_active() {
    let flag = Arc::new(AtomicBool::new(true));
    let address = resolve(&windows_image(), &terminate_round(Platform::Windows)).unwrap();

    let mut table = HookTable::new();
    table
        .install_pre_hook(
            terminate_round_fn(address),
            Box::new(TerminateRoundInterceptor::new(Flag(flag.clone()))),
        )
        .unwrap();
    assert!(table.is_hooked(address));

    let body_runs = Cell::new(0);
    let body = |_: &[Arg]| {
        body_runs.set(body_runs.get() + 1);
        1
    };

    assert_eq!(table.invoke(address, &ARGS, body), SUPPRESS_ROUND_END);
    assert_eq!(body_runs.get(), 0, "native body must not run during warm-up");

    flag.store(false, Ordering::SeqCst);
    assert_eq!(table.invoke(address, &ARGS, body), 1);
    assert_eq!(body_runs.get(), 1);
}

#[test]
fn test_unhooked_address_runs_body() {
    let table = HookTable::new();
    assert_eq!(table.invoke(FunctionAddress(0x10), &ARGS, |_| 42), 42);
}

struct Always(i32);

impl PreHook for Always {
    fn pre_call(&self, _args: &[Arg]) -> HookAction {
        HookAction::Override(self.0)
    }
}

#[test]
fn test_first_override_wins() {
    let address = FunctionAddress(0x10);
    let mut table = HookTable::new();
    table
        .install_pre_hook(terminate_round_fn(address), Box::new(Always(5)))
        .unwrap();
    table
        .install_pre_hook(terminate_round_fn(address), Box::new(Always(6)))
        .unwrap();
    assert_eq!(table.hook_count(address), 2);
    assert_eq!(table.invoke(address, &ARGS, |_| 0), 5);
}

#[test]
fn test_signature_mismatch_rejected() {
    let address = FunctionAddress(0x10);
    let mut table = HookTable::new();
    table
        .install_pre_hook(terminate_round_fn(address), Box::new(Always(5)))
        .unwrap();

    let other = NativeFunction {
        name: "Other",
        address,
        signature: NativeSignature {
            convention: Convention::Cdecl,
            args: &[DataType::Int],
            ret: DataType::Void,
        },
    };
    let err = table.install_pre_hook(other, Box::new(Always(1))).unwrap_err();
    assert!(matches!(err, HookError::SignatureMismatch(a) if a == address));
    assert_eq!(table.hook_count(address), 1);
}
