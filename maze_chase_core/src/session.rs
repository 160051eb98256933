use serde::{Deserialize, Serialize};

use crate::{
    Direction, EntityId, Position,
    agent::{Agent, ProtagonistPreset},
    encounter::{self, EncounterOutcome},
    level::Level,
    map::{Cell, Grid},
};

/// Lifecycle of a play session. `Defeated` and `Victorious` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Defeated,
    Victorious,
}

/// Report of a single movement tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Whether the protagonist moved. Adversaries only move when it did.
    pub moved: bool,
}

/// Everything that changes during one play-through of a level.
///
/// A session is created from a loaded [`Level`] and owned by whoever drives
/// the game loop. Starting over means building a new session.
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid<Cell>,
    protagonist: Agent,
    adversaries: Vec<Agent>,
    start: Position,
    goal: Position,
    state: SessionState,
}

impl Session {
    /// Places the protagonist on the start cell and one adversary per spawn
    /// entry on its door.
    pub fn new(preset: ProtagonistPreset, level: &Level) -> Self {
        let adversaries: Vec<Agent> = level
            .spawn_points()
            .map(|(kind, door)| Agent::adversary(kind, door))
            .collect();
        tracing::info!(
            protagonist = preset.name(),
            adversaries = adversaries.len(),
            "session started"
        );

        Session {
            grid: level.grid().clone(),
            protagonist: Agent::protagonist(preset, level.start()),
            adversaries,
            start: level.start(),
            goal: level.goal(),
            state: SessionState::Active,
        }
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn protagonist(&self) -> &Agent {
        &self.protagonist
    }

    pub fn adversaries(&self) -> &[Agent] {
        &self.adversaries
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state != SessionState::Active
    }

    /// Advances the protagonist by the first pressed direction (in
    /// [`Direction::PRIORITY`] order) whose destination is inside the grid
    /// and not a wall. If it moved, every adversary then takes one step of
    /// a freshly computed path toward the protagonist's new cell.
    pub fn tick(&mut self, pressed: &[Direction]) -> TickOutcome {
        if self.is_over() {
            tracing::warn!(state = ?self.state, "tick requested on a finished session");
            return TickOutcome::default();
        }

        let Some(next) = self.protagonist_step(pressed) else {
            return TickOutcome::default();
        };
        tracing::debug!(from = %self.protagonist.position(), to = %next, "protagonist step");
        self.protagonist.place_at(next);

        for adversary in &mut self.adversaries {
            adversary.advance_toward(next, &self.grid);
        }

        TickOutcome { moved: true }
    }

    /// Evaluates collisions and the goal after movement and updates the
    /// session state. A finished session keeps reporting its final outcome.
    pub fn resolve_encounters(&mut self) -> EncounterOutcome {
        match self.state {
            SessionState::Defeated => return EncounterOutcome::Defeated,
            SessionState::Victorious => return EncounterOutcome::Victorious,
            SessionState::Active => {}
        }

        let outcome = encounter::resolve_encounters(
            &mut self.protagonist,
            &self.adversaries,
            self.start,
            self.goal,
        );
        match outcome {
            EncounterOutcome::Defeated => self.state = SessionState::Defeated,
            EncounterOutcome::Victorious => self.state = SessionState::Victorious,
            EncounterOutcome::None | EncounterOutcome::Damaged => {}
        }
        outcome
    }

    /// Convenience for drivers: [`Session::tick`] followed by
    /// [`Session::resolve_encounters`] when the protagonist moved.
    pub fn step(&mut self, pressed: &[Direction]) -> (TickOutcome, EncounterOutcome) {
        let tick = self.tick(pressed);
        let encounter = if tick.moved {
            self.resolve_encounters()
        } else {
            EncounterOutcome::None
        };
        (tick, encounter)
    }

    /// Number of hops on the adversary's current path to the protagonist,
    /// recomputed with its own strategy. `None` for an unknown adversary or
    /// when no path exists.
    pub fn adversary_distance(&self, adversary: EntityId) -> Option<usize> {
        let path = self
            .adversaries
            .get(adversary)?
            .path_to(self.protagonist.position(), &self.grid)?;
        Some(path.len() - 1)
    }

    fn protagonist_step(&self, pressed: &[Direction]) -> Option<Position> {
        let current = self.protagonist.position();
        Direction::PRIORITY
            .into_iter()
            .filter(|direction| pressed.contains(direction))
            .find_map(|direction| {
                let (dx, dy) = direction.delta();
                self.grid
                    .step(current, dx, dy)
                    .filter(|next| self.grid.is_walkable(*next))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DoorId,
        level::{DoorAnchor, LevelLayout, parse_level},
    };

    const LEVEL: &str = "\
Karakter:Stormtrooper,Kapi:A
0 0 0 0 0 0 0
0 1 1 0 1 1 0
0 0 0 0 0 0 0
0 1 1 0 1 1 0
0 0 0 0 0 0 0
";

    fn layout() -> LevelLayout {
        LevelLayout {
            width: 7,
            height: 5,
            doors: vec![DoorAnchor {
                id: DoorId('A'),
                position: Position::new(0, 0),
            }],
            start: Position::new(3, 2),
            goal: Position::new(6, 4),
        }
    }

    fn session(preset: ProtagonistPreset) -> Session {
        Session::new(preset, &parse_level(LEVEL, &layout()).unwrap())
    }

    #[test]
    fn new_session_places_agents() {
        let session = session(ProtagonistPreset::LukeSkywalker);
        assert_eq!(session.protagonist().position(), Position::new(3, 2));
        assert_eq!(session.protagonist().health(), 3.0);
        assert_eq!(session.adversaries().len(), 1);
        assert_eq!(session.adversaries()[0].position(), Position::new(0, 0));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn adversaries_spawned_on_one_door_move_independently() {
        let text = "Karakter:DarthVader,Kapi:A\nKarakter:KyloRen,Kapi:A\n".to_string()
            + LEVEL.trim_start_matches("Karakter:Stormtrooper,Kapi:A\n");
        let mut session = Session::new(
            ProtagonistPreset::LukeSkywalker,
            &parse_level(&text, &layout()).unwrap(),
        );

        session.tick(&[Direction::Left]);

        let [vader, kylo] = session.adversaries() else {
            panic!("expected two adversaries");
        };
        assert_eq!(vader.position(), Position::new(1, 0));
        assert_eq!(kylo.position(), Position::new(0, 2));
    }

    #[test]
    fn first_legal_direction_in_priority_order_wins() {
        let mut session = session(ProtagonistPreset::LukeSkywalker);
        // Up from (3, 2) is open; Right is listed first but Up has priority.
        let outcome = session.tick(&[Direction::Right, Direction::Up]);
        assert!(outcome.moved);
        assert_eq!(session.protagonist().position(), Position::new(3, 1));
    }

    #[test]
    fn blocked_direction_falls_through_to_the_next_pressed_one() {
        let mut session = session(ProtagonistPreset::LukeSkywalker);
        session.protagonist.place_at(Position::new(1, 2));
        // Up and Down from (1, 2) are walls.
        session.tick(&[Direction::Up, Direction::Down, Direction::Left]);
        assert_eq!(session.protagonist().position(), Position::new(0, 2));
    }

    #[test]
    fn no_input_or_blocked_input_moves_nobody() {
        let mut session = session(ProtagonistPreset::LukeSkywalker);
        session.protagonist.place_at(Position::new(1, 2));
        let before = session.adversaries()[0].position();

        assert!(!session.tick(&[]).moved);
        assert!(!session.tick(&[Direction::Up]).moved);
        assert_eq!(session.adversaries()[0].position(), before);
    }

    #[test]
    fn grid_boundary_blocks_the_protagonist() {
        let mut session = session(ProtagonistPreset::LukeSkywalker);
        session.protagonist.place_at(Position::new(0, 4));
        assert!(!session.tick(&[Direction::Left, Direction::Down]).moved);
    }

    #[test]
    fn adversary_chases_the_new_position() {
        let mut session = session(ProtagonistPreset::LukeSkywalker);
        session.tick(&[Direction::Up]);
        // Stormtrooper at (0, 0) heads along the top row toward (3, 1).
        assert_eq!(session.adversaries()[0].position(), Position::new(1, 0));
        assert_eq!(session.adversary_distance(0), Some(3));
    }

    #[test]
    fn collision_at_start_resets_protagonist_but_not_adversary() {
        for (preset, expected) in [
            (ProtagonistPreset::LukeSkywalker, 2.0),
            (ProtagonistPreset::MasterYoda, 5.5),
        ] {
            let mut session = session(preset);
            let start = session.start();
            session.adversaries[0].place_at(start);

            assert_eq!(session.resolve_encounters(), EncounterOutcome::Damaged);
            assert_eq!(session.protagonist().health(), expected);
            assert_eq!(session.protagonist().position(), start);
            assert_eq!(session.adversaries()[0].position(), start);
            assert_eq!(session.state(), SessionState::Active);
        }
    }

    #[test]
    fn final_hit_defeats_and_stops_ticks() {
        let mut session = session(ProtagonistPreset::LukeSkywalker);
        session.protagonist.take_damage(2.0);
        let spot = session.protagonist().position();
        session.adversaries[0].place_at(spot);

        assert_eq!(session.resolve_encounters(), EncounterOutcome::Defeated);
        assert_eq!(session.protagonist().health(), 0.0);
        assert_eq!(session.state(), SessionState::Defeated);

        assert!(!session.tick(&[Direction::Up]).moved);
        assert_eq!(session.protagonist().position(), spot);
        assert_eq!(session.resolve_encounters(), EncounterOutcome::Defeated);
    }

    #[test]
    fn reaching_the_goal_is_victory() {
        let mut session = session(ProtagonistPreset::MasterYoda);
        session.protagonist.place_at(session.goal());
        assert_eq!(session.resolve_encounters(), EncounterOutcome::Victorious);
        assert!(session.is_over());
        assert!(!session.tick(&[Direction::Up]).moved);
    }

    #[test]
    fn distance_is_zero_when_adversary_is_on_the_protagonist() {
        let mut session = session(ProtagonistPreset::LukeSkywalker);
        let here = session.protagonist().position();
        session.adversaries[0].place_at(here);
        assert_eq!(session.adversary_distance(0), Some(0));
        assert_eq!(session.adversary_distance(1), None);
    }

    #[test]
    fn step_skips_encounters_without_movement() {
        let mut session = session(ProtagonistPreset::LukeSkywalker);
        let here = session.protagonist().position();
        session.adversaries[0].place_at(here);
        let (tick, encounter) = session.step(&[]);
        assert!(!tick.moved);
        assert_eq!(encounter, EncounterOutcome::None);
        assert_eq!(session.protagonist().health(), 3.0);
    }
}
