//! An in-memory engine adapter.
//!
//! `SimEngine` implements every capability in [`crate::engine`] with plain
//! collections and records everything the plugin sends outward (text,
//! sounds, console commands), so tests and the demo binary can drive the
//! plugin without a game server and inspect what it did.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::{
    EntityId, EntityList, Messenger, PlayerHandle, PlayerRegistry, ServerConsole, Team, UserId,
    WEAPON_CLASS_PREFIX, WeaponCatalog,
};

/// The weapon catalog a fresh [`SimEngine`] starts with.
pub const DEFAULT_CATALOG: &[&str] = &[
    "ak47", "m4a1", "awp", "deagle", "glock", "usp_silencer", "p250", "mp9", "nova", "knife",
    "hegrenade", "flashbang", "smokegrenade",
];

/// A simulated player.
#[derive(Debug, Clone)]
pub struct SimPlayer {
    userid: UserId,
    alive: bool,
    team: Team,
    weapons: Vec<String>,
    restricted: BTreeSet<String>,
    respawns: u32,
}

impl SimPlayer {
    /// A living player on `team` with no weapons.
    pub fn new(userid: UserId, team: Team) -> Self {
        Self {
            userid,
            alive: true,
            team,
            weapons: Vec::new(),
            restricted: BTreeSet::new(),
            respawns: 0,
        }
    }

    /// Marks the player dead (as the engine would before `player_death`).
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Moves the player to another team.
    pub fn set_team(&mut self, team: Team) {
        self.team = team;
    }

    /// How many times the player has been respawned.
    pub fn respawn_count(&self) -> u32 {
        self.respawns
    }

    /// Whether `basename` is restricted for this player.
    pub fn is_restricted(&self, basename: &str) -> bool {
        self.restricted.contains(basename)
    }

    /// Number of carried instances of `basename`.
    pub fn count_of(&self, basename: &str) -> usize {
        self.weapons.iter().filter(|w| *w == basename).count()
    }
}

impl PlayerHandle for SimPlayer {
    fn userid(&self) -> UserId {
        self.userid
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn team(&self) -> Team {
        self.team
    }

    fn weapons(&self) -> Vec<String> {
        self.weapons.clone()
    }

    fn grant_item(&mut self, basename: &str) {
        self.weapons.push(basename.to_string());
    }

    fn remove_item(&mut self, basename: &str) {
        if let Some(pos) = self.weapons.iter().position(|w| w == basename) {
            self.weapons.remove(pos);
        }
    }

    fn restrict(&mut self, basenames: &[String]) {
        self.restricted.extend(basenames.iter().cloned());
    }

    fn unrestrict(&mut self, basenames: &[String]) {
        for name in basenames {
            self.restricted.remove(name);
        }
    }

    fn restricted(&self) -> Vec<String> {
        self.restricted.iter().cloned().collect()
    }

    fn respawn(&mut self) {
        self.alive = true;
        self.respawns += 1;
    }
}

/// A weapon entity lying in (or carried through) the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimEntity {
    pub classname: String,
    pub owner: Option<UserId>,
}

/// Everything the plugin sent out of the engine, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Center(String),
    Tell(UserId, String),
    Sound(UserId, String),
    Command(String),
}

/// In-memory engine.
#[derive(Debug, Clone)]
pub struct SimEngine {
    catalog: Vec<String>,
    players: BTreeMap<UserId, SimPlayer>,
    entities: BTreeMap<EntityId, SimEntity>,
    next_entity: u32,
    outbound: Vec<Outbound>,
}

impl Default for SimEngine {
    fn default() -> Self {
        Self::with_catalog(DEFAULT_CATALOG.iter().map(|s| s.to_string()))
    }
}

impl SimEngine {
    /// An engine with [`DEFAULT_CATALOG`] and no players.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with a custom weapon catalog.
    pub fn with_catalog(catalog: impl IntoIterator<Item = String>) -> Self {
        Self {
            catalog: catalog.into_iter().collect(),
            players: BTreeMap::new(),
            entities: BTreeMap::new(),
            next_entity: 1,
            outbound: Vec::new(),
        }
    }

    /// Connects a living player.
    pub fn connect(&mut self, userid: UserId, team: Team) -> &mut SimPlayer {
        self.players
            .entry(userid)
            .or_insert_with(|| SimPlayer::new(userid, team))
    }

    /// Disconnects a player. Returns `false` if they weren't connected.
    pub fn disconnect(&mut self, userid: UserId) -> bool {
        self.players.remove(&userid).is_some()
    }

    /// Read access to a player.
    pub fn player(&self, userid: UserId) -> Option<&SimPlayer> {
        self.players.get(&userid)
    }

    /// Mutable access to the concrete player, for test setup.
    pub fn sim_player_mut(&mut self, userid: UserId) -> Option<&mut SimPlayer> {
        self.players.get_mut(&userid)
    }

    /// Drops a weapon entity into the world.
    pub fn spawn_entity(&mut self, classname: &str, owner: Option<UserId>) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(
            id,
            SimEntity {
                classname: classname.to_string(),
                owner,
            },
        );
        id
    }

    /// Looks up a world entity.
    pub fn entity(&self, id: EntityId) -> Option<&SimEntity> {
        self.entities.get(&id)
    }

    /// Adds a basename to the weapon catalog.
    pub fn add_weapon_type(&mut self, basename: &str) {
        if !self.catalog.iter().any(|w| w == basename) {
            self.catalog.push(basename.to_string());
        }
    }

    /// Everything sent outward so far.
    pub fn outbound(&self) -> &[Outbound] {
        &self.outbound
    }

    /// Takes and clears the outbound log.
    pub fn drain_outbound(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbound)
    }

    /// Console commands issued so far.
    pub fn commands(&self) -> Vec<&str> {
        self.outbound
            .iter()
            .filter_map(|o| match o {
                Outbound::Command(c) => Some(c.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl WeaponCatalog for SimEngine {
    fn weapon_basenames(&self) -> Vec<String> {
        self.catalog.clone()
    }
}

impl PlayerRegistry for SimEngine {
    fn connected_players(&self) -> Vec<UserId> {
        self.players.keys().copied().collect()
    }

    fn player_mut(&mut self, userid: UserId) -> Option<&mut dyn PlayerHandle> {
        self.players
            .get_mut(&userid)
            .map(|p| p as &mut dyn PlayerHandle)
    }
}

impl EntityList for SimEngine {
    fn idle_weapons(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| {
                e.classname.starts_with(WEAPON_CLASS_PREFIX)
                    && e.owner.is_none_or(|owner| !self.players.contains_key(&owner))
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn remove_entity(&mut self, entity: EntityId) {
        if self.entities.remove(&entity).is_some() {
            trace!(%entity, "entity removed");
        }
    }
}

impl Messenger for SimEngine {
    fn broadcast_center(&mut self, text: &str) {
        self.outbound.push(Outbound::Center(text.to_string()));
    }

    fn tell(&mut self, userid: UserId, text: &str) {
        self.outbound.push(Outbound::Tell(userid, text.to_string()));
    }

    fn play_sound(&mut self, userid: UserId, sample: &str) {
        self.outbound.push(Outbound::Sound(userid, sample.to_string()));
    }
}

impl ServerConsole for SimEngine {
    fn server_command(&mut self, command: &str) {
        self.outbound.push(Outbound::Command(command.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_weapons_excludes_owned_and_non_weapons() {
        let mut engine = SimEngine::new();
        engine.connect(UserId(1), Team::Terrorist);
        let owned = engine.spawn_entity("weapon_ak47", Some(UserId(1)));
        let orphaned = engine.spawn_entity("weapon_awp", Some(UserId(99)));
        let loose = engine.spawn_entity("weapon_knife", None);
        let prop = engine.spawn_entity("prop_physics", None);

        let idle = engine.idle_weapons();
        assert!(!idle.contains(&owned));
        assert!(idle.contains(&orphaned));
        assert!(idle.contains(&loose));
        assert!(!idle.contains(&prop));
    }

    #[test]
    fn test_remove_item_removes_one_instance() {
        let mut p = SimPlayer::new(UserId(1), Team::Terrorist);
        p.grant_item("hegrenade");
        p.grant_item("hegrenade");
        p.remove_item("hegrenade");
        assert_eq!(p.count_of("hegrenade"), 1);
    }

    #[test]
    fn test_respawn_revives_and_counts() {
        let mut p = SimPlayer::new(UserId(1), Team::Terrorist);
        p.kill();
        assert!(!p.is_alive());
        p.respawn();
        assert!(p.is_alive());
        assert_eq!(p.respawn_count(), 1);
    }

    #[test]
    fn test_outbound_log_records_in_order() {
        let mut engine = SimEngine::new();
        engine.broadcast_center("hi");
        engine.server_command("mp_restartgame 1");
        assert_eq!(
            engine.outbound(),
            &[
                Outbound::Center("hi".into()),
                Outbound::Command("mp_restartgame 1".into())
            ]
        );
        assert_eq!(engine.commands(), vec!["mp_restartgame 1"]);
        assert_eq!(engine.drain_outbound().len(), 2);
        assert!(engine.outbound().is_empty());
    }
}
