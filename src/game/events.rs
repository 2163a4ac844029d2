//! Game Events
//!
//! Notable state transitions recorded during simulation. Events are purely
//! informational: the engine never reads them back. A front-end drains them
//! after each tick for sound, effects or logging.

use serde::{Serialize, Deserialize};

use crate::core::vec2::{Point, Vector};
use crate::game::ball::BallId;
use crate::game::brick::BrickId;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A brick was removed from the grid
    BrickDestroyed {
        /// The destroyed brick
        brick: BrickId,
        /// Cell it occupied
        grid_position: Point,
    },

    /// A ball entered play
    BallAdded {
        /// The new ball
        ball: BallId,
    },

    /// A ball left the playfield and was removed
    BallLost {
        /// The lost ball
        ball: BallId,
    },

    /// A master brick released a key ball
    KeyBallSpawned {
        /// The key ball
        ball: BallId,
        /// Locked brick it can open
        locked: BrickId,
    },

    /// A weak or strong ball reverted to standard
    BehaviorExpired {
        /// The ball
        ball: BallId,
    },

    /// The paddle grew or shrank
    PaddleResized {
        /// New half-width
        half_width: i64,
    },

    /// A ball was sped up or slowed down
    BallSpeedChanged {
        /// The ball
        ball: BallId,
        /// New velocity
        velocity: Vector,
    },
}

/// A game event stamped with simulation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Simulated milliseconds since the game started
    pub time_millis: i64,

    /// Order of emission within the game
    pub sequence: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(time_millis: i64, sequence: u64, data: GameEventData) -> Self {
        Self { time_millis, sequence, data }
    }

    /// Ball this event concerns, if any.
    pub fn ball(&self) -> Option<BallId> {
        match self.data {
            GameEventData::BallAdded { ball }
            | GameEventData::BallLost { ball }
            | GameEventData::KeyBallSpawned { ball, .. }
            | GameEventData::BehaviorExpired { ball }
            | GameEventData::BallSpeedChanged { ball, .. } => Some(ball),
            _ => None,
        }
    }
}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: time, then emission order
        self.time_millis
            .cmp(&other.time_millis)
            .then(self.sequence.cmp(&other.sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ordering() {
        let lost = GameEvent::new(40, 3, GameEventData::BallLost { ball: BallId(1) });
        let added = GameEvent::new(20, 7, GameEventData::BallAdded { ball: BallId(2) });
        let resized = GameEvent::new(40, 4, GameEventData::PaddleResized { half_width: 10 });

        // Earlier time first, then emission order
        assert!(added < lost);
        assert!(lost < resized);
    }

    #[test]
    fn test_event_ball() {
        let e = GameEvent::new(0, 0, GameEventData::KeyBallSpawned { ball: BallId(4), locked: BrickId(1) });
        assert_eq!(e.ball(), Some(BallId(4)));
        let e = GameEvent::new(0, 0, GameEventData::PaddleResized { half_width: 10 });
        assert_eq!(e.ball(), None);
    }
}
