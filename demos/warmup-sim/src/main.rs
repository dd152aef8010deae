//! Runs one map's warm-up against the in-memory engine.
//!
//! Four players join, a scripted stream of spawns, a blocked purchase, a
//! grenade throw, a death, a team change and a round-end attempt plays
//! out, and the 64 Hz frame clock drives the countdown in real time until
//! the warm-up restarts the round (about 45 seconds).
//!
//! ```text
//! RUST_LOG=debug cargo run -p warmup-sim
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;
use warmup::engine::{Outbound, PlayerHandle};
use warmup::hook::Arg;
use warmup::prelude::*;

// ---------------------------------------------------------------------------
// Scripted inputs
// ---------------------------------------------------------------------------

enum Input {
    Event(GameEvent),
    Buy(UserId, &'static str),
    Kill(UserId),
    RoundEnd,
}

const PLAYERS: [(UserId, Team); 4] = [
    (UserId(1), Team::Terrorist),
    (UserId(2), Team::Terrorist),
    (UserId(3), Team::CounterTerrorist),
    (UserId(4), Team::Spectator),
];

async fn script(tx: mpsc::Sender<Input>) {
    let at = |secs: f64| tokio::time::sleep(Duration::from_secs_f64(secs));

    at(0.5).await;
    for (userid, team) in PLAYERS {
        if team.is_playing() {
            tx.send(Input::Event(GameEvent::PlayerSpawn { userid })).await.ok();
        }
    }
    at(1.5).await;
    tx.send(Input::Buy(UserId(1), "ak47")).await.ok();
    at(1.0).await;
    tx.send(Input::Event(GameEvent::WeaponFire {
        userid: UserId(2),
        weapon: "hegrenade".into(),
    }))
    .await
    .ok();
    at(2.0).await;
    tx.send(Input::Kill(UserId(3))).await.ok();
    at(3.0).await;
    tx.send(Input::Event(GameEvent::PlayerTeam {
        userid: UserId(4),
        team: Team::CounterTerrorist.id(),
    }))
    .await
    .ok();
    at(2.0).await;
    tx.send(Input::RoundEnd).await.ok();
}

/// A fake `server` module carrying both the Windows pattern and the Linux
/// symbol, so the demo loads on either platform.
fn server_image() -> ModuleImage {
    let mut bytes = vec![0xCC; 64];
    bytes.extend_from_slice(&[
        0x55, 0x8B, 0xEC, 0x83, 0xEC, 0x10, 0x8B, 0x45, 0x0C, 0x53, 0x56, 0x57, 0x33, 0xF6,
    ]);
    ModuleImage::new("server", 0x1000_0000, bytes)
        .with_symbol("_ZN12CCSGameRules14TerminateRoundEfi", 64)
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), WarmupError> {
    init_logging();

    let mut engine = SimEngine::new();
    for (userid, team) in PLAYERS {
        let player = engine.connect(userid, team);
        // Spectators sit dead until they pick a team.
        if !team.is_playing() {
            player.kill();
        }
    }
    // Loose weapons that the first spawn sweeps away.
    engine.spawn_entity("weapon_awp", None);
    engine.spawn_entity("weapon_ak47", None);

    let mut hooks = HookTable::new();
    let mut plugin = WarmupPlugin::load(&server_image(), &mut hooks, WarmupConfig::default())?;
    let round_end = plugin.terminate_round().address;
    info!(address = %round_end, "TerminateRound hooked");

    let effect = plugin.on_level_init("de_dust2");
    info!(?effect, "map started");

    let (tx, mut rx) = mpsc::channel(16);
    tokio::spawn(script(tx));

    let mut clock = FrameClock::new(FrameConfig::with_rate(64));
    while plugin.controller().is_active() {
        tokio::select! {
            Some(input) = rx.recv() => match input {
                Input::Event(event) => plugin.on_event(&mut engine, &event),
                Input::Buy(userid, item) => {
                    let verdict = plugin.on_client_command(&mut engine, userid, &["buy", item]);
                    info!(%userid, item, ?verdict, "buy");
                }
                Input::Kill(userid) => {
                    if let Some(player) = engine.sim_player_mut(userid) {
                        player.kill();
                    }
                    plugin.on_event(&mut engine, &GameEvent::PlayerDeath { userid });
                }
                Input::RoundEnd => {
                    let args = [Arg::Pointer(0), Arg::Float(5.0), Arg::Int(8), Arg::Int(0)];
                    let result = hooks.invoke(round_end, &args, |_| {
                        info!("round ended");
                        1
                    });
                    info!(result, "TerminateRound called");
                }
            },
            frame = clock.wait_for_frame() => {
                plugin.on_frame(&mut engine, frame.dt);
            }
        }
    }

    plugin.on_level_shutdown(&mut engine);

    for out in engine.outbound() {
        match out {
            Outbound::Center(text) => info!(text, "center"),
            Outbound::Tell(userid, text) => info!(%userid, text, "chat"),
            Outbound::Sound(userid, sample) => info!(%userid, sample, "sound"),
            Outbound::Command(cmd) => info!(cmd, "console"),
        }
    }
    for (userid, _) in PLAYERS {
        if let Some(player) = engine.player(userid) {
            info!(
                %userid,
                respawns = player.respawn_count(),
                alive = player.is_alive(),
                "final state"
            );
        }
    }
    Ok(())
}
