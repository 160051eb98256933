use serde::{Deserialize, Serialize};

use crate::{
    Position,
    agent::{Agent, AgentKind},
};

/// Result of evaluating collisions after a tick's movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterOutcome {
    /// Nothing happened.
    None,
    /// The protagonist was caught, lost health and was sent back to the start.
    Damaged,
    /// The protagonist was caught with no health left. Ends the session.
    Defeated,
    /// The protagonist reached the goal. Ends the session.
    Victorious,
}

impl EncounterOutcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, EncounterOutcome::Defeated | EncounterOutcome::Victorious)
    }
}

/// Applies the collision rules for one tick.
///
/// A catch takes precedence over reaching the goal. At most one catch is
/// processed per tick: the first adversary in roster order sharing the
/// protagonist's cell. Adversaries are never repositioned.
pub fn resolve_encounters(
    protagonist: &mut Agent,
    adversaries: &[Agent],
    start: Position,
    goal: Position,
) -> EncounterOutcome {
    let AgentKind::Protagonist(preset) = protagonist.kind() else {
        return EncounterOutcome::None;
    };
    let position = protagonist.position();

    if let Some(catcher) = adversaries
        .iter()
        .find(|adversary| adversary.position() == position)
    {
        let remaining = protagonist.take_damage(preset.damage_per_hit());
        if remaining <= 0.0 {
            tracing::info!(catcher = catcher.name(), %position, "protagonist defeated");
            return EncounterOutcome::Defeated;
        }

        tracing::info!(
            catcher = catcher.name(),
            %position,
            health = remaining,
            "protagonist caught, returning to start"
        );
        protagonist.place_at(start);
        return EncounterOutcome::Damaged;
    }

    if position == goal {
        tracing::info!(%position, "protagonist reached the goal");
        return EncounterOutcome::Victorious;
    }

    EncounterOutcome::None
}
