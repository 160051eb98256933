use std::time::{Duration, Instant};

/// Real-time rate limiter for protagonist movement.
///
/// The gate is re-armed only when a move is recorded, so a frame without a
/// move leaves it open.
#[derive(Debug, Clone)]
pub struct MoveGate {
    interval: Duration,
    last_move: Option<Instant>,
}

impl MoveGate {
    pub fn new(interval: Duration) -> Self {
        MoveGate {
            interval,
            last_move: None,
        }
    }

    /// True once `interval` has elapsed since the last recorded move.
    pub fn is_open(&self, now: Instant) -> bool {
        self.last_move
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    pub fn record_move(&mut self, now: Instant) {
        self.last_move = Some(now);
    }

    /// Time left until the gate opens, zero if it is already open.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.last_move.map_or(Duration::ZERO, |last| {
            self.interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }
}
