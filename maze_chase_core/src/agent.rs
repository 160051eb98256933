use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Position,
    map::{Cell, Grid},
    pathfinding::{Path, PathFinder, Strategy},
};

/// Which side of the chase an agent is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Affiliation {
    Protagonist,
    Adversary,
}

/// Playable characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtagonistPreset {
    LukeSkywalker,
    MasterYoda,
}

impl ProtagonistPreset {
    pub const ALL: [ProtagonistPreset; 2] =
        [ProtagonistPreset::LukeSkywalker, ProtagonistPreset::MasterYoda];

    pub fn name(self) -> &'static str {
        match self {
            ProtagonistPreset::LukeSkywalker => "Luke Skywalker",
            ProtagonistPreset::MasterYoda => "Master Yoda",
        }
    }

    pub fn max_health(self) -> f32 {
        match self {
            ProtagonistPreset::LukeSkywalker => 3.0,
            ProtagonistPreset::MasterYoda => 6.0,
        }
    }

    /// Health lost each time an adversary catches this character.
    pub fn damage_per_hit(self) -> f32 {
        match self {
            ProtagonistPreset::LukeSkywalker => 1.0,
            ProtagonistPreset::MasterYoda => 0.5,
        }
    }
}

/// Pursuers. They differ only in how they find their way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdversaryKind {
    DarthVader,
    KyloRen,
    Stormtrooper,
}

impl AdversaryKind {
    pub fn name(self) -> &'static str {
        match self {
            AdversaryKind::DarthVader => "Darth Vader",
            AdversaryKind::KyloRen => "Kylo Ren",
            AdversaryKind::Stormtrooper => "Stormtrooper",
        }
    }

    pub fn strategy(self) -> Strategy {
        match self {
            AdversaryKind::DarthVader => Strategy::Unobstructed,
            AdversaryKind::KyloRen => Strategy::DoubleStep,
            AdversaryKind::Stormtrooper => Strategy::WallRespecting,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown adversary kind '{0}'")]
pub struct UnknownAdversary(pub String);

/// Parses the identifiers used in level headers (`DarthVader`, `KyloRen`,
/// `Stormtrooper`).
impl FromStr for AdversaryKind {
    type Err = UnknownAdversary;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DarthVader" => Ok(AdversaryKind::DarthVader),
            "KyloRen" => Ok(AdversaryKind::KyloRen),
            "Stormtrooper" => Ok(AdversaryKind::Stormtrooper),
            other => Err(UnknownAdversary(other.to_string())),
        }
    }
}

impl fmt::Display for AdversaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Protagonist(ProtagonistPreset),
    Adversary(AdversaryKind),
}

/// An entity with a position that takes part in movement and collisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    name: String,
    kind: AgentKind,
    position: Position,
    health: f32,
    max_health: f32,
}

impl Agent {
    pub fn protagonist(preset: ProtagonistPreset, position: Position) -> Self {
        Agent {
            name: preset.name().to_string(),
            kind: AgentKind::Protagonist(preset),
            position,
            health: preset.max_health(),
            max_health: preset.max_health(),
        }
    }

    /// Adversaries are never damaged; they carry a nominal single health point.
    pub fn adversary(kind: AdversaryKind, position: Position) -> Self {
        Agent {
            name: kind.name().to_string(),
            kind: AgentKind::Adversary(kind),
            position,
            health: 1.0,
            max_health: 1.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn affiliation(&self) -> Affiliation {
        match self.kind {
            AgentKind::Protagonist(_) => Affiliation::Protagonist,
            AgentKind::Adversary(_) => Affiliation::Adversary,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Replaces the stored position.
    pub fn place_at(&mut self, position: Position) {
        self.position = position;
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Removes `amount` health, never going below zero. Returns what is left.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        self.health = (self.health - amount).max(0.0);
        self.health
    }

    /// Pathing strategy, present for adversaries only.
    pub fn strategy(&self) -> Option<Strategy> {
        match self.kind {
            AgentKind::Adversary(kind) => Some(kind.strategy()),
            AgentKind::Protagonist(_) => None,
        }
    }

    /// Computes a fresh path from this agent's position to `target`.
    pub fn path_to(&self, target: Position, grid: &Grid<Cell>) -> Option<Path> {
        self.strategy()?.find_path(self.position, target, grid)
    }

    /// Moves one path step toward `target`. Returns `true` if the agent moved.
    ///
    /// A hop may span more than one cell depending on the strategy. No move
    /// happens when there is no path or the agent already stands on `target`.
    pub fn advance_toward(&mut self, target: Position, grid: &Grid<Cell>) -> bool {
        let next = self
            .path_to(target, grid)
            .and_then(|path| path.get(1).copied());
        match next {
            Some(next) => {
                tracing::debug!(agent = %self.name, from = %self.position, to = %next, "adversary step");
                self.position = next;
                true
            }
            None => false,
        }
    }
}
