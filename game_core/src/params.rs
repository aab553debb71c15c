/// Game tuning parameters for Cyberpong
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Arena (logical units, independent of client viewport)
    pub const ARENA_WIDTH: f32 = 1920.0;
    pub const ARENA_HEIGHT: f32 = 1080.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 160.0;
    pub const PADDLE_INSET: f32 = 0.05; // Fraction of arena width from each side
    pub const PADDLE_STEP: f32 = 15.0; // Units per move event

    // Ball
    pub const BALL_SIZE: f32 = 60.0;
    pub const SERVE_GAP: f32 = 10.0; // Gap between serving paddle and ball
    pub const BALL_SPEED_BASE: f32 = 30.0;
    pub const BALL_SPEED_MAX: f32 = 60.0;
    pub const BALL_SPEED_INCREMENT: f32 = 5.0; // Added to base speed per paddle hit

    // Score
    pub const WIN_SCORE: u8 = 11;

    // Skill classes
    pub const CLASS_BONUS: f32 = 1.2;
    pub const STRENGTH_COOLDOWN_MS: u64 = 20_000;
    pub const AGILITY_COOLDOWN_MS: u64 = 15_000;
    pub const INTELLECT_COOLDOWN_MS: u64 = 25_000;

    // Skill effects
    pub const SLOW_TIME_DURATION_MS: u64 = 3_000;
    pub const SLOW_TIME_CASTER_FACTOR: f32 = 0.7;
    pub const SLOW_TIME_OPPONENT_FACTOR: f32 = 0.4;
    pub const INVERT_DURATION_MS: u64 = 3_000;
    pub const TELEPORT_ZONE: f32 = 0.25; // Fraction of arena width on the caster's side
    pub const TELEPORT_SNAP: f32 = 0.25; // Fraction of arena width moved toward mid-court

    // Scheduling
    pub const TICK_INTERVAL_MS: u64 = 16; // ~60 Hz
}
