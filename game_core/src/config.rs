use crate::{Params, PlayerId};
use glam::Vec2;

/// Immutable per-match configuration
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_inset: f32,
    pub paddle_step: f32,
    pub ball_size: f32,
    pub serve_gap: f32,
    pub ball_speed_base: f32,
    pub ball_speed_max: f32,
    pub ball_speed_increment: f32,
    pub win_score: u8,
    pub slow_time_duration_ms: u64,
    pub slow_time_caster_factor: f32,
    pub slow_time_opponent_factor: f32,
    pub invert_duration_ms: u64,
    pub teleport_zone: f32,
    pub teleport_snap: f32,
    pub tick_interval_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            arena_width: Params::ARENA_WIDTH,
            arena_height: Params::ARENA_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_inset: Params::PADDLE_INSET,
            paddle_step: Params::PADDLE_STEP,
            ball_size: Params::BALL_SIZE,
            serve_gap: Params::SERVE_GAP,
            ball_speed_base: Params::BALL_SPEED_BASE,
            ball_speed_max: Params::BALL_SPEED_MAX,
            ball_speed_increment: Params::BALL_SPEED_INCREMENT,
            win_score: Params::WIN_SCORE,
            slow_time_duration_ms: Params::SLOW_TIME_DURATION_MS,
            slow_time_caster_factor: Params::SLOW_TIME_CASTER_FACTOR,
            slow_time_opponent_factor: Params::SLOW_TIME_OPPONENT_FACTOR,
            invert_duration_ms: Params::INVERT_DURATION_MS,
            teleport_zone: Params::TELEPORT_ZONE,
            teleport_snap: Params::TELEPORT_SNAP,
            tick_interval_ms: Params::TICK_INTERVAL_MS,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arena_center(&self) -> Vec2 {
        Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }

    /// Get X position for paddle based on player
    pub fn paddle_x(&self, player: PlayerId) -> f32 {
        match player {
            PlayerId::One => self.arena_width * self.paddle_inset,
            PlayerId::Two => self.arena_width * (1.0 - self.paddle_inset),
        }
    }

    /// Clamp a paddle centre so the whole paddle stays inside the arena
    pub fn clamp_paddle_y(&self, y: f32, paddle_height: f32) -> f32 {
        let half_height = paddle_height / 2.0;
        y.clamp(half_height, self.arena_height - half_height)
    }

    /// Ball centre for a serve owned by `player`: just outside that player's paddle
    pub fn serve_position(&self, player: PlayerId) -> Vec2 {
        let half_paddle = self.paddle_width / 2.0;
        let half_ball = self.ball_size / 2.0;
        let x = match player {
            PlayerId::One => self.paddle_x(player) + half_paddle + half_ball + self.serve_gap,
            PlayerId::Two => self.paddle_x(player) - half_paddle - half_ball - self.serve_gap,
        };
        Vec2::new(x, self.arena_height / 2.0)
    }
}
