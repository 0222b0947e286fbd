use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    VehicleDestruction,
    ActorDeath,
    HostilityEvent,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::VehicleDestruction => "VehicleDestruction",
            EventKind::ActorDeath => "ActorDeath",
            EventKind::HostilityEvent => "HostilityEvent",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDestructionEntry {
    pub timestamp: DateTime<Utc>,
    pub vehicle_name: String,
    pub vehicle_id: String,
    pub zone: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub driver_name: String,
    pub driver_id: String,
    pub from_level: u32,
    pub to_level: u32,
    pub caused_by_name: String,
    pub caused_by_id: String,
    pub cause_tag_team: String,
    pub cause_tag_category: String,
}

impl VehicleDestructionEntry {
    /// The pilot blew up their own ship.
    pub fn is_backspace(&self) -> bool {
        self.driver_name == self.caused_by_name && self.driver_name == self.vehicle_name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorDeathEntry {
    pub timestamp: DateTime<Utc>,
    pub victim_name: String,
    pub victim_id: String,
    pub zone: String,
    pub killer_name: String,
    pub killer_id: String,
    pub weapon_name: String,
    pub damage_type: String,
    pub direction: Vec3,
    pub team_tag_1: String,
    pub team_tag_2: String,
}

impl ActorDeathEntry {
    /// Self-inflicted death: the game reports victim, killer and weapon as the
    /// same name.
    pub fn is_backspace(&self) -> bool {
        self.victim_name == self.killer_name && self.killer_name == self.weapon_name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostilityEventEntry {
    pub timestamp: DateTime<Utc>,
    pub source_name: String,
    pub target_name: String,
    pub child_name: String,
    pub tag_1: String,
    pub tag_2: String,
}

impl HostilityEventEntry {
    /// Two hits display the same when source, target and child element match.
    /// Tags are not part of the comparison.
    pub fn is_display_equal(&self, other: &HostilityEventEntry) -> bool {
        self.source_name == other.source_name
            && self.target_name == other.target_name
            && self.child_name == other.child_name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LogEntry {
    VehicleDestruction(VehicleDestructionEntry),
    ActorDeath(ActorDeathEntry),
    HostilityEvent(HostilityEventEntry),
}

impl LogEntry {
    pub fn kind(&self) -> EventKind {
        match self {
            LogEntry::VehicleDestruction(_) => EventKind::VehicleDestruction,
            LogEntry::ActorDeath(_) => EventKind::ActorDeath,
            LogEntry::HostilityEvent(_) => EventKind::HostilityEvent,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogEntry::VehicleDestruction(entry) => entry.timestamp,
            LogEntry::ActorDeath(entry) => entry.timestamp,
            LogEntry::HostilityEvent(entry) => entry.timestamp,
        }
    }
}
