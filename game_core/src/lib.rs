pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
pub mod modifiers;
pub mod params;
pub mod player;
pub mod resources;
pub mod simulation;
pub mod skills;
pub mod systems;

pub use components::*;
pub use config::*;
pub use error::*;
pub use geometry::*;
pub use modifiers::*;
pub use params::*;
pub use player::*;
pub use resources::*;
pub use simulation::*;
pub use skills::*;

pub use glam::Vec2;
use hecs::World;

/// Helper to create a paddle entity, centred vertically on its side
pub fn create_paddle(world: &mut World, config: &MatchConfig, player: PlayerId) -> hecs::Entity {
    let body = Body::new(
        Vec2::new(config.paddle_x(player), config.arena_height / 2.0),
        Vec2::new(config.paddle_width, config.paddle_height),
    );
    world.spawn((Paddle::new(player), body, PlayerModifiers::new()))
}

/// Helper to create the ball entity, at rest
pub fn create_ball(world: &mut World, config: &MatchConfig, pos: Vec2) -> hecs::Entity {
    let body = Body::new(pos, Vec2::splat(config.ball_size));
    world.spawn((Ball::new(config.ball_speed_base), body))
}

/// Current body of `player`'s paddle
pub fn paddle_body(world: &World, player: PlayerId) -> Option<Body> {
    let mut query = world.query::<(&Paddle, &Body)>();
    let body = query
        .iter()
        .find(|(_e, (paddle, _))| paddle.player == player)
        .map(|(_e, (_, body))| *body);
    body
}

/// Current body of the ball
pub fn ball_body(world: &World) -> Option<Body> {
    let mut query = world.query::<(&Ball, &Body)>();
    let body = query.iter().next().map(|(_e, (_, body))| *body);
    body
}
