use crate::PlayerId;

/// Game score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub player1: u8,
    pub player2: u8,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: PlayerId) -> u8 {
        match player {
            PlayerId::One => self.player1,
            PlayerId::Two => self.player2,
        }
    }

    pub fn increment(&mut self, player: PlayerId) {
        match player {
            PlayerId::One => self.player1 += 1,
            PlayerId::Two => self.player2 += 1,
        }
    }

    /// Raise a score to at least `value`; never lowers it
    pub fn raise_to(&mut self, player: PlayerId, value: u8) {
        let slot = match player {
            PlayerId::One => &mut self.player1,
            PlayerId::Two => &mut self.player2,
        };
        *slot = (*slot).max(value);
    }

    pub fn has_winner(&self, win_score: u8) -> Option<PlayerId> {
        if self.player1 >= win_score {
            Some(PlayerId::One)
        } else if self.player2 >= win_score {
            Some(PlayerId::Two)
        } else {
            None
        }
    }
}

/// Final outcome handed to the match recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub p1_id: u64,
    pub p2_id: u64,
    pub winner_id: u64,
    pub p1_score: u8,
    pub p2_score: u8,
    pub p1_class_id: u8,
    pub p2_class_id: u8,
}

/// Discrete notifications produced by the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BallHitPaddle { player: PlayerId },
    BallHitWall,
    PointReset { scorer: PlayerId },
    SkillReady { player: PlayerId },
    SkillConsumed { player: PlayerId },
    MatchOver(MatchResult),
}

/// Events that occurred since the last drain
#[derive(Debug, Clone, Default)]
pub struct Events {
    pub queue: Vec<GameEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queue)
    }
}
