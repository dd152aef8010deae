//! End-to-end tests: the plugin loaded against an in-memory server image,
//! hook table and simulated engine.

use std::time::Duration;

use warmup::engine::{JsonEventCodec, Outbound, PlayerHandle};
use warmup::hook::{Arg, HookError, SUPPRESS_ROUND_END};
use warmup::phase::{Deferred, FixedEffect, PhaseController};
use warmup::prelude::*;
use warmup::tick::DelayQueue;

const T1: UserId = UserId(1);
const FRAME: Duration = Duration::from_millis(250);
const SYMBOL: &str = "_ZN12CCSGameRules14TerminateRoundEfi";

fn linux_image() -> ModuleImage {
    ModuleImage::new("server_srv.so", 0x7f00_0000, vec![0; 256]).with_symbol(SYMBOL, 0x80)
}

fn load(
    effect: EffectKind,
    hooks: &mut HookTable,
) -> Result<WarmupPlugin<FixedEffect, JsonEventCodec>, WarmupError> {
    let controller: PhaseController<FixedEffect, DelayQueue<Deferred>> =
        PhaseController::new(WarmupConfig::default(), FixedEffect(effect), DelayQueue::new());
    WarmupPlugin::load_with(
        &linux_image(),
        hooks,
        Platform::Linux,
        controller,
        JsonEventCodec,
    )
}

fn engine() -> SimEngine {
    let mut engine = SimEngine::new();
    engine.connect(T1, Team::Terrorist);
    engine
}

/// Calls the hooked routine the way the engine would at round end.
fn end_round(hooks: &HookTable, plugin: &WarmupPlugin<FixedEffect, JsonEventCodec>) -> i32 {
    let args = [Arg::Pointer(0x1234), Arg::Float(7.0), Arg::Int(9), Arg::Int(0)];
    hooks.invoke(plugin.terminate_round().address, &args, |_| 1)
}

#[test]
fn test_load_fails_loudly_without_signature() {
    let mut hooks = HookTable::new();
    let image = ModuleImage::new("server_srv.so", 0, vec![0; 16]);
    let controller = PhaseController::new(
        WarmupConfig::default(),
        FixedEffect(EffectKind::Grenade),
        DelayQueue::new(),
    );
    let result =
        WarmupPlugin::load_with(&image, &mut hooks, Platform::Linux, controller, JsonEventCodec);

    assert!(matches!(
        result,
        Err(WarmupError::Hook(HookError::NotFound { .. }))
    ));
}

#[test]
fn test_load_installs_hook_at_symbol() {
    let mut hooks = HookTable::new();
    let plugin = load(EffectKind::Grenade, &mut hooks).unwrap();
    let address = plugin.terminate_round().address;
    assert_eq!(address.0, 0x7f00_0080);
    assert!(hooks.is_hooked(address));
    assert!(!plugin.controller().is_active());
}

#[test]
fn test_full_map_lifecycle() {
    let mut hooks = HookTable::new();
    let mut engine = engine();
    let mut plugin = load(EffectKind::PistolOnly, &mut hooks).unwrap();

    // Before warm-up rounds end normally.
    assert_eq!(end_round(&hooks, &plugin), 1);

    assert_eq!(plugin.on_level_init("de_dust2"), Some(EffectKind::PistolOnly));
    assert_eq!(end_round(&hooks, &plugin), SUPPRESS_ROUND_END);

    plugin.on_event(&mut engine, &GameEvent::PlayerSpawn { userid: T1 });
    assert_eq!(engine.player(T1).unwrap().weapons(), vec!["deagle".to_string()]);

    assert_eq!(
        plugin.on_client_command(&mut engine, T1, &["buy", "AK47"]),
        CommandResult::Block
    );

    // Run the clock past the end of the warm-up.
    for _ in 0..(4 * 46) {
        plugin.on_frame(&mut engine, FRAME);
    }

    assert!(!plugin.controller().is_active());
    assert_eq!(end_round(&hooks, &plugin), 1);
    assert_eq!(engine.commands(), vec!["mp_restartgame 1"]);
    assert!(engine.player(T1).unwrap().restricted().is_empty());
    assert_eq!(
        plugin.on_client_command(&mut engine, T1, &["buy", "ak47"]),
        CommandResult::Continue
    );
}

#[test]
fn test_level_shutdown_mid_warmup_then_next_map() {
    let mut hooks = HookTable::new();
    let mut engine = engine();
    let mut plugin = load(EffectKind::KnifeOnly, &mut hooks).unwrap();

    plugin.on_level_init("de_inferno");
    for _ in 0..20 {
        plugin.on_frame(&mut engine, FRAME);
    }
    plugin.on_level_shutdown(&mut engine);
    assert!(!plugin.controller().is_active());
    assert_eq!(end_round(&hooks, &plugin), 1);
    assert!(engine.commands().is_empty(), "no restart on map change");

    assert_eq!(plugin.on_level_init("de_nuke"), Some(EffectKind::KnifeOnly));
    assert_eq!(plugin.controller().elapsed(), Some(0));
    assert_eq!(end_round(&hooks, &plugin), SUPPRESS_ROUND_END);
}

#[test]
fn test_double_level_init_keeps_first_warmup() {
    let mut hooks = HookTable::new();
    let mut engine = engine();
    let mut plugin = load(EffectKind::Grenade, &mut hooks).unwrap();

    assert!(plugin.on_level_init("de_mirage").is_some());
    for _ in 0..8 {
        plugin.on_frame(&mut engine, FRAME);
    }
    assert_eq!(plugin.on_level_init("de_mirage"), None);
    assert_eq!(plugin.controller().elapsed(), Some(2));
}

#[test]
fn test_raw_payloads_routed_and_malformed_dropped() {
    let mut hooks = HookTable::new();
    let mut engine = engine();
    let mut plugin = load(EffectKind::KnifeOnly, &mut hooks).unwrap();
    plugin.on_level_init("de_train");

    plugin.on_event_payload(&mut engine, b"{garbage");
    plugin.on_event_payload(&mut engine, br#"{"event":"player_spawn","userid":77}"#);
    assert!(plugin.controller().is_active());

    engine.sim_player_mut(T1).unwrap().kill();
    plugin.on_event_payload(&mut engine, br#"{"event":"player_death","userid":1}"#);
    plugin.on_frame(&mut engine, Duration::ZERO);
    assert!(engine.player(T1).unwrap().is_alive());
}

#[test]
fn test_other_commands_pass_through() {
    let mut hooks = HookTable::new();
    let mut engine = engine();
    let mut plugin = load(EffectKind::Grenade, &mut hooks).unwrap();
    plugin.on_level_init("de_vertigo");

    assert_eq!(
        plugin.on_client_command(&mut engine, T1, &["say", "hi"]),
        CommandResult::Continue
    );
    assert_eq!(
        plugin.on_client_command(&mut engine, T1, &["buy"]),
        CommandResult::Continue
    );
    assert!(engine.outbound().is_empty());

    assert_eq!(
        plugin.on_client_command(&mut engine, T1, &["BUY", "m4a1"]),
        CommandResult::Block
    );
    assert!(matches!(
        engine.outbound().first(),
        Some(Outbound::Tell(u, text)) if *u == T1 && text.contains("M4A1")
    ));
}
