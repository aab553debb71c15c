use crate::PlayerId;
use glam::Vec2;

/// Paddle component - represents a player's paddle
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub player: PlayerId,
    pub velocity_sign: i8, // -1 = up, 0 = still, 1 = down; cleared every tick
}

impl Paddle {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            velocity_sign: 0,
        }
    }
}

/// Ball component - the pong ball
///
/// `direction` is never renormalized: serve directions are derived
/// from positional deltas divided by arena extents, and paddle hits add the
/// paddle's velocity sign onto the vertical component.
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub direction: Vec2,
    pub speed: f32,      // Effective speed (base speed x hitter multiplier)
    pub base_speed: f32, // Shared base speed, ramps up on paddle hits
}

impl Ball {
    pub fn new(base_speed: f32) -> Self {
        Self {
            direction: Vec2::ZERO,
            speed: 0.0,
            base_speed,
        }
    }

    /// Stop the ball and restore the base speed
    pub fn reset(&mut self, base_speed: f32) {
        self.direction = Vec2::ZERO;
        self.speed = 0.0;
        self.base_speed = base_speed;
    }
}
