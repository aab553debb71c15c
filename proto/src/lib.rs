//! Network protocol for Cyberpong
//!
//! Uses postcard for efficient binary serialization over the match websocket.
//! `MatchRecord` doubles as the JSON body returned by the match API.

use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};

// ============================================================================
// Shared types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Per-tick view of the match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub tick: u32,
    pub timestamp: u64, // ms
    pub ball: Point,
    pub direction: Point,
    pub paddle1: Point,
    pub paddle2: Point,
    pub paddle1_size: Point,
    pub paddle2_size: Point,
    pub score1: u8,
    pub score2: u8,
}

/// Persisted outcome of a finished match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Assigned by the match store; `None` when recording failed
    pub id: Option<u64>,
    pub p1_id: u64,
    pub p2_id: u64,
    pub winner_id: u64,
    pub p1_score: u8,
    pub p2_score: u8,
    pub p1_class_id: u8,
    pub p2_class_id: u8,
}

// ============================================================================
// C2S Messages (Client to Server)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Client finished loading (or went back to loading)
    Loaded { ready: bool },
    /// Paddle step: -1 = up, 1 = down
    Move { dir: i8 },
    Stop,
    Serve,
    ActivateSkill,
    /// 0 = none, 1 = strength, 2 = agility, 3 = intellect
    ChooseClass { class_id: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum C2S {
    /// seq: client-side sequence number, echoed nowhere; kept for client prediction
    Input {
        player_id: u8,
        action: PlayerAction,
        seq: u32,
    },

    /// Ping for latency measurement
    Ping { t_ms: u32 },
}

// ============================================================================
// S2C Messages (Server to Client)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum S2C {
    /// Slot assignment: 1 = left, 2 = right
    Welcome { player_id: u8 },

    /// Both slots filled, match is starting
    MatchFound,

    /// Game state snapshot
    GameState(GameStateSnapshot),

    PointReset { scorer: u8 },

    SkillReady { player_id: u8 },

    SkillConsumed { player_id: u8 },

    MatchFinished(MatchRecord),

    /// Input refused; only sent to the offending player
    Rejected { reason: String },

    /// Pong response to ping
    Pong { t_ms: u32 },
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl C2S {
    /// Serialize C2S message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize C2S message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

impl S2C {
    /// Serialize S2C message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize S2C message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c2s_input_serialization() {
        let msg = C2S::Input {
            player_id: 2,
            action: PlayerAction::ChooseClass { class_id: 3 },
            seq: 41,
        };
        let bytes = msg.to_bytes().expect("Serialization should succeed");
        let decoded = C2S::from_bytes(&bytes).expect("Deserialization should succeed");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_s2c_snapshot_serialization() {
        let msg = S2C::GameState(GameStateSnapshot {
            tick: 100,
            timestamp: 1_700_000_000_000,
            ball: Point::new(960.0, 540.0),
            direction: Point::new(-0.42, 0.05),
            paddle1: Point::new(96.0, 540.0),
            paddle2: Point::new(1824.0, 300.0),
            paddle1_size: Point::new(20.0, 192.0),
            paddle2_size: Point::new(20.0, 160.0),
            score1: 5,
            score2: 3,
        });
        let bytes = msg.to_bytes().expect("Serialization should succeed");
        let decoded = S2C::from_bytes(&bytes).expect("Deserialization should succeed");
        match decoded {
            S2C::GameState(snapshot) => {
                assert_eq!(snapshot.tick, 100);
                assert_eq!(snapshot.paddle2.y, 300.0);
                assert_eq!(snapshot.score1, 5);
            }
            _ => panic!("Message type mismatch"),
        }
    }

    #[test]
    fn test_unrecorded_match_keeps_empty_id() {
        let msg = S2C::MatchFinished(MatchRecord {
            id: None,
            p1_id: 7,
            p2_id: 9,
            winner_id: 9,
            p1_score: 4,
            p2_score: 11,
            p1_class_id: 0,
            p2_class_id: 2,
        });
        let bytes = msg.to_bytes().unwrap();
        match S2C::from_bytes(&bytes).unwrap() {
            S2C::MatchFinished(record) => assert_eq!(record.id, None),
            _ => panic!("Message type mismatch"),
        }
    }

    #[test]
    fn test_truncated_frame_is_an_error() {
        let bytes = C2S::Ping { t_ms: 1234 }.to_bytes().unwrap();
        assert!(C2S::from_bytes(&bytes[..1]).is_err());
    }
}
