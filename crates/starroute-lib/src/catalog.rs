use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Numeric identifier for a star system.
pub type SystemId = i64;

/// Numeric identifier for a faction.
pub type FactionId = i64;

/// Minimum Jaro-Winkler similarity for a name to count as a suggestion.
const MIN_SUGGESTION_SIMILARITY: f64 = 0.7;

/// Cartesian coordinates, used only for distances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f64; 3]> for Position {
    fn from(value: [f64; 3]) -> Self {
        Self {
            x: value[0],
            y: value[1],
            z: value[2],
        }
    }
}

/// Exploration status of a star system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    /// Fully surveyed and charted.
    Surveyed,
    /// Charted but only partially surveyed.
    Charted,
    /// Unexplored or otherwise unknown.
    #[default]
    Unknown,
}

/// Size classification of a star system's primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemSize {
    Dwarf,
    #[default]
    Medium,
    Large,
    Giant,
    /// A binary pair sharing one map location.
    Binary,
}

impl SystemSize {
    /// Render scale factor for this size class.
    pub fn scale(self) -> f64 {
        match self {
            SystemSize::Dwarf => 0.90,
            SystemSize::Medium => 1.0,
            SystemSize::Large => 1.15,
            SystemSize::Giant => 1.27,
            SystemSize::Binary => 1.4,
        }
    }
}

/// Confirmation classification of a jump point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JumpPointKind {
    Confirmed,
    Unconfirmed,
    #[default]
    Undiscovered,
}

/// Size class of a jump point aperture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JumpPointSize {
    #[default]
    Small,
    Medium,
    Large,
}

/// Directed edge between two star systems.
///
/// Endpoints are stored as identifiers and resolved through the [`Catalog`];
/// the edge A→B says nothing about B→A, which is a separate object when it
/// exists.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpPoint {
    pub name: String,
    pub source: SystemId,
    pub destination: SystemId,
    pub kind: JumpPointKind,
    pub size: JumpPointSize,
    /// Offset of the jump point entry from the system origin, in AU.
    pub entry_au: Position,
}

impl JumpPoint {
    /// Whether this connection is unconfirmed or undiscovered.
    pub fn is_unconfirmed(&self) -> bool {
        matches!(
            self.kind,
            JumpPointKind::Unconfirmed | JumpPointKind::Undiscovered
        )
    }

    /// Straight-line length of the connection in light years.
    ///
    /// Returns 0.0 when either endpoint is missing from the catalog.
    pub fn length(&self, catalog: &Catalog) -> f64 {
        match (catalog.system(self.source), catalog.system(self.destination)) {
            (Some(source), Some(destination)) => {
                source.position.distance_to(&destination.position)
            }
            _ => 0.0,
        }
    }
}

/// A place routes can pass through or terminate at.
#[derive(Debug, Clone, PartialEq)]
pub struct StarSystem {
    pub id: SystemId,
    /// Globally unique string key, stable across catalog revisions.
    pub uuid: String,
    pub name: String,
    pub nickname: Option<String>,
    pub position: Position,
    pub faction: Option<FactionId>,
    pub size: SystemSize,
    pub status: SystemStatus,
    pub off_limits: bool,
    /// Whether the system is a binary pair. Derived from the size
    /// classification once at catalog load.
    pub binary: bool,
    pub jump_points: Vec<JumpPoint>,
}

impl StarSystem {
    /// Render scale factor derived from the size classification.
    pub fn scale(&self) -> f64 {
        self.size.scale()
    }

    /// Whether the system is unexplored.
    pub fn is_unknown(&self) -> bool {
        self.status == SystemStatus::Unknown
    }

    /// The outgoing jump point leading to `destination`, if one exists.
    pub fn jump_point_to(&self, destination: SystemId) -> Option<&JumpPoint> {
        self.jump_points
            .iter()
            .find(|jump| jump.destination == destination)
    }
}

impl fmt::Display for StarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A political entity claiming star systems.
///
/// Hostility is computed from the `outlaw` marker, never stored: the outlaw
/// designation is hostile to every non-outlaw faction and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub color: String,
    pub parent: Option<FactionId>,
    pub outlaw: bool,
    claimed: HashSet<SystemId>,
}

impl Faction {
    /// Whether this faction and `other` are hostile to each other.
    pub fn is_hostile_to(&self, other: &Faction) -> bool {
        self.outlaw != other.outlaw
    }

    /// Whether this faction claims the given system.
    pub fn claims(&self, system: SystemId) -> bool {
        self.claimed.contains(&system)
    }

    /// Systems claimed by this faction.
    pub fn claimed_systems(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.claimed.iter().copied()
    }
}

/// Read-only arena of star systems and factions.
///
/// Built once from a catalog document and shared (typically via `Arc`) into
/// every solver and route; there is no ambient global lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    systems: HashMap<SystemId, StarSystem>,
    factions: HashMap<FactionId, Faction>,
    by_uuid: HashMap<String, SystemId>,
    by_name: HashMap<String, SystemId>,
}

impl Catalog {
    /// Lookup a system by identifier.
    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(&id)
    }

    /// Lookup a system by its unique string key.
    pub fn system_by_uuid(&self, uuid: &str) -> Option<&StarSystem> {
        self.by_uuid.get(uuid).and_then(|id| self.systems.get(id))
    }

    /// Lookup a system by its case-sensitive display name.
    pub fn system_by_name(&self, name: &str) -> Option<&StarSystem> {
        self.by_name.get(name).and_then(|id| self.systems.get(id))
    }

    /// Lookup a faction by identifier.
    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(&id)
    }

    /// Lookup a faction by its case-sensitive name.
    pub fn faction_by_name(&self, name: &str) -> Option<&Faction> {
        self.factions.values().find(|faction| faction.name == name)
    }

    /// Whether two factions are hostile to each other. Unknown identifiers
    /// are treated as non-hostile.
    pub fn hostile_between(&self, a: FactionId, b: FactionId) -> bool {
        match (self.factions.get(&a), self.factions.get(&b)) {
            (Some(a), Some(b)) => a.is_hostile_to(b),
            _ => false,
        }
    }

    /// Locate the reverse edge of `jump`, if the destination system has one.
    pub fn reverse_of(&self, jump: &JumpPoint) -> Option<&JumpPoint> {
        self.system(jump.destination)
            .and_then(|destination| destination.jump_point_to(jump.source))
    }

    /// Number of systems in the catalog.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether the catalog has no systems.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Iterate over all systems, in unspecified order.
    pub fn systems(&self) -> impl Iterator<Item = &StarSystem> {
        self.systems.values()
    }

    /// Iterate over all factions, in unspecified order.
    pub fn factions(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values()
    }

    /// Suggest system names similar to `name`, best match first.
    pub fn fuzzy_system_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .systems
            .values()
            .map(|system| {
                (
                    strsim::jaro_winkler(&needle, &system.name.to_lowercase()),
                    system.name.as_str(),
                )
            })
            .filter(|(score, _)| *score >= MIN_SUGGESTION_SIMILARITY)
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Build a catalog from a decoded document.
    ///
    /// Resolution cross-references every record: faction parents and claims
    /// are linked up, jump points with missing endpoints or self-loops are
    /// dropped with a warning, missing jump point names are synthesised, and
    /// the binary flag is derived from the size classification.
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        let mut factions: HashMap<FactionId, Faction> = HashMap::new();
        for record in document.factions {
            if factions.contains_key(&record.id) {
                warn!(faction = record.id, "duplicate faction record dropped");
                continue;
            }
            factions.insert(
                record.id,
                Faction {
                    id: record.id,
                    name: record.name,
                    color: record.color.unwrap_or_else(|| "#ffffff".to_string()),
                    parent: record.parent_faction,
                    outlaw: record.outlaw,
                    claimed: HashSet::new(),
                },
            );
        }

        let parent_ids: Vec<(FactionId, FactionId)> = factions
            .values()
            .filter_map(|faction| faction.parent.map(|parent| (faction.id, parent)))
            .collect();
        for (faction, parent) in parent_ids {
            if !factions.contains_key(&parent) {
                warn!(faction, parent, "unknown parent faction reference cleared");
                if let Some(entry) = factions.get_mut(&faction) {
                    entry.parent = None;
                }
            }
        }

        let mut systems: HashMap<SystemId, StarSystem> = HashMap::new();
        let mut pending_jumps: Vec<(SystemId, JumpPointRecord)> = Vec::new();
        for record in document.systems {
            if systems.contains_key(&record.id) {
                warn!(system = record.id, name = %record.name, "duplicate system record dropped");
                continue;
            }

            let faction = match record.faction {
                Some(id) if factions.contains_key(&id) => {
                    if let Some(faction) = factions.get_mut(&id) {
                        faction.claimed.insert(record.id);
                    }
                    Some(id)
                }
                Some(id) => {
                    warn!(system = record.id, faction = id, "unknown faction reference cleared");
                    None
                }
                None => None,
            };

            for jump in record.jump_points {
                pending_jumps.push((record.id, jump));
            }

            let uuid = record
                .uuid
                .unwrap_or_else(|| record.name.to_lowercase().replace(char::is_whitespace, "-"));

            systems.insert(
                record.id,
                StarSystem {
                    id: record.id,
                    uuid,
                    name: record.name,
                    nickname: record.nickname,
                    position: record.coordinates.into(),
                    faction,
                    size: record.size,
                    status: record.status,
                    off_limits: record.is_off_limits,
                    binary: record.size == SystemSize::Binary,
                    jump_points: Vec::new(),
                },
            );
        }

        let mut dropped = 0usize;
        let mut resolved = 0usize;
        for (source, record) in pending_jumps {
            if record.destination == source {
                warn!(system = source, "self-loop jump point dropped");
                dropped += 1;
                continue;
            }
            if !systems.contains_key(&record.destination) {
                warn!(
                    system = source,
                    destination = record.destination,
                    "jump point to unknown system dropped"
                );
                dropped += 1;
                continue;
            }

            let name = record.name.unwrap_or_else(|| {
                format!(
                    "[{} to {}]",
                    systems[&source].name, systems[&record.destination].name
                )
            });
            let jump = JumpPoint {
                name,
                source,
                destination: record.destination,
                kind: record.kind,
                size: record.size,
                entry_au: record.entry_au.map(Position::from).unwrap_or_default(),
            };
            if let Some(system) = systems.get_mut(&source) {
                system.jump_points.push(jump);
                resolved += 1;
            }
        }

        let mut by_uuid = HashMap::new();
        let mut by_name = HashMap::new();
        for system in systems.values() {
            by_uuid.insert(system.uuid.clone(), system.id);
            by_name.insert(system.name.clone(), system.id);
        }

        debug!(
            systems = systems.len(),
            factions = factions.len(),
            jump_points = resolved,
            dropped,
            "catalog resolved"
        );

        Ok(Self {
            systems,
            factions,
            by_uuid,
            by_name,
        })
    }
}

/// Raw catalog document as found on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub factions: Vec<FactionRecord>,
    #[serde(default)]
    pub systems: Vec<SystemRecord>,
}

/// Raw faction record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionRecord {
    pub id: FactionId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub parent_faction: Option<FactionId>,
    #[serde(default)]
    pub outlaw: bool,
}

/// Raw star system record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRecord {
    pub id: SystemId,
    pub name: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub coordinates: [f64; 3],
    #[serde(default)]
    pub faction: Option<FactionId>,
    #[serde(default)]
    pub size: SystemSize,
    #[serde(default)]
    pub status: SystemStatus,
    #[serde(default)]
    pub is_off_limits: bool,
    #[serde(default)]
    pub jump_points: Vec<JumpPointRecord>,
}

/// Raw jump point record, embedded in its source system.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JumpPointRecord {
    #[serde(default)]
    pub name: Option<String>,
    pub destination: SystemId,
    #[serde(default)]
    pub kind: JumpPointKind,
    #[serde(default)]
    pub size: JumpPointSize,
    #[serde(default)]
    pub entry_au: Option<[f64; 3]>,
}

/// Load and resolve a catalog document from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = std::fs::read_to_string(path)?;
    let document: CatalogDocument = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), "loading catalog");
    Catalog::from_document(document)
}
