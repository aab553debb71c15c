use crate::{Ball, Body, MatchConfig, Paddle, PlayerId, PlayerModifiers};
use hecs::World;

/// Move ball along its direction
pub fn move_ball(world: &mut World, time_factor: f32) {
    for (_entity, (body, ball)) in world.query_mut::<(&mut Body, &Ball)>() {
        body.center += ball.direction * ball.speed * time_factor;
    }
}

/// Displace `player`'s paddle by one step in direction `sign`.
///
/// The step is scaled by the player's time factor, speed multiplier and
/// invert sign, and the paddle is clamped fully inside the arena. When
/// `carry_ball` is set the ball follows the paddle vertically (serve carry).
/// A paddle edge landing exactly on the ball's edge spikes the ball, flipping
/// its vertical direction.
pub fn move_paddle(
    world: &mut World,
    config: &MatchConfig,
    player: PlayerId,
    sign: i8,
    carry_ball: bool,
) {
    let mut moved = None;

    for (_entity, (paddle, body, modifiers)) in
        world.query_mut::<(&mut Paddle, &mut Body, &PlayerModifiers)>()
    {
        if paddle.player != player {
            continue;
        }

        let delta = config.paddle_step
            * sign as f32
            * modifiers.time_factor
            * modifiers.paddle_speed_multiplier
            * modifiers.paddle_invert_sign;
        body.center.y = config.clamp_paddle_y(body.center.y + delta, body.size.y);

        paddle.velocity_sign = if delta > 0.0 {
            1
        } else if delta < 0.0 {
            -1
        } else {
            0
        };
        moved = Some(*body);
    }

    let Some(paddle_body) = moved else {
        return;
    };

    for (_entity, (body, ball)) in world.query_mut::<(&mut Body, &mut Ball)>() {
        if carry_ball {
            body.center.y = paddle_body.center.y;
        }
        if paddle_body.touches_vertically(body) {
            ball.direction.y = -ball.direction.y;
        }
    }
}

/// Clear the player's transient paddle velocity
pub fn stop_paddle(world: &mut World, player: PlayerId) {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.player == player {
            paddle.velocity_sign = 0;
        }
    }
}

/// Clear every paddle's transient velocity once a tick has used it
pub fn clear_paddle_velocity(world: &mut World) {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        paddle.velocity_sign = 0;
    }
}
