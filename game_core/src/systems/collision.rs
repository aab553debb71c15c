use crate::{Ball, Body, Events, GameEvent, MatchConfig, Paddle, PlayerId, PlayerModifiers};
use hecs::World;

/// Reflect the ball off the top and bottom walls
pub fn bounce_off_walls(world: &mut World, config: &MatchConfig, events: &mut Events) {
    for (_entity, (body, ball)) in world.query_mut::<(&Body, &mut Ball)>() {
        // Point the vertical direction away from the wall so a ball that sank
        // past it doesn't flip back and forth on consecutive ticks
        if body.top() <= 0.0 {
            ball.direction.y = ball.direction.y.abs();
            events.push(GameEvent::BallHitWall);
        } else if body.bottom() >= config.arena_height {
            ball.direction.y = -ball.direction.y.abs();
            events.push(GameEvent::BallHitWall);
        }
    }
}

/// Reflect the ball off a paddle it overlaps while moving toward it.
///
/// A hit adds the paddle's velocity sign into the vertical direction, ramps the
/// base speed by the configured increment (capped at the maximum) and applies
/// the hitting player's ball-speed multiplier.
pub fn bounce_off_paddles(world: &mut World, config: &MatchConfig, events: &mut Events) {
    // First, collect paddle data without holding borrows
    let paddles: Vec<(PlayerId, Body, i8, f32)> = world
        .query::<(&Paddle, &Body, &PlayerModifiers)>()
        .iter()
        .map(|(_e, (paddle, body, modifiers))| {
            (
                paddle.player,
                *body,
                paddle.velocity_sign,
                modifiers.ball_speed_multiplier,
            )
        })
        .collect();

    for (_entity, (body, ball)) in world.query_mut::<(&Body, &mut Ball)>() {
        for &(player, paddle_body, velocity_sign, ball_speed_multiplier) in &paddles {
            let moving_toward = match player {
                PlayerId::One => ball.direction.x < 0.0,
                PlayerId::Two => ball.direction.x > 0.0,
            };
            if !moving_toward || !body.overlaps(&paddle_body) {
                continue;
            }

            ball.direction.x = -ball.direction.x;
            ball.direction.y += velocity_sign as f32;
            ball.base_speed =
                (ball.base_speed + config.ball_speed_increment).min(config.ball_speed_max);
            ball.speed = ball.base_speed * ball_speed_multiplier;

            events.push(GameEvent::BallHitPaddle { player });
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle};
    use glam::Vec2;

    fn setup_world() -> (World, MatchConfig, Events) {
        let config = MatchConfig::new();
        let mut world = World::new();
        create_paddle(&mut world, &config, PlayerId::One);
        create_paddle(&mut world, &config, PlayerId::Two);
        (world, config, Events::new())
    }

    fn spawn_ball(world: &mut World, config: &MatchConfig, pos: Vec2, direction: Vec2) {
        create_ball(world, config, pos);
        for (_e, ball) in world.query_mut::<&mut Ball>() {
            ball.direction = direction;
            ball.speed = config.ball_speed_base;
        }
    }

    fn ball(world: &World) -> Ball {
        world.query::<&Ball>().iter().next().map(|(_e, b)| *b).unwrap()
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let (mut world, config, mut events) = setup_world();
        spawn_ball(&mut world, &config, Vec2::new(960.0, 29.0), Vec2::new(0.3, -0.2));

        bounce_off_walls(&mut world, &config, &mut events);

        assert_eq!(ball(&world).direction, Vec2::new(0.3, 0.2));
        assert_eq!(events.queue, vec![GameEvent::BallHitWall]);
    }

    #[test]
    fn test_ball_bounces_off_bottom_wall() {
        let (mut world, config, mut events) = setup_world();
        spawn_ball(&mut world, &config, Vec2::new(960.0, 1051.0), Vec2::new(0.3, 0.2));

        bounce_off_walls(&mut world, &config, &mut events);

        assert_eq!(ball(&world).direction, Vec2::new(0.3, -0.2));
    }

    #[test]
    fn test_ball_deep_in_wall_does_not_oscillate() {
        let (mut world, config, mut events) = setup_world();
        // Already heading back down after a previous reflection
        spawn_ball(&mut world, &config, Vec2::new(960.0, 10.0), Vec2::new(0.3, 0.2));

        bounce_off_walls(&mut world, &config, &mut events);

        assert_eq!(ball(&world).direction.y, 0.2);
    }

    #[test]
    fn test_no_wall_contact_in_open_court() {
        let (mut world, config, mut events) = setup_world();
        spawn_ball(&mut world, &config, Vec2::new(960.0, 540.0), Vec2::new(0.3, 0.2));

        bounce_off_walls(&mut world, &config, &mut events);

        assert_eq!(ball(&world).direction, Vec2::new(0.3, 0.2));
        assert!(events.is_empty());
    }

    #[test]
    fn test_ball_collides_with_left_paddle() {
        let (mut world, config, mut events) = setup_world();
        // Paddle one right edge is at x=106; ball left edge at 100
        spawn_ball(&mut world, &config, Vec2::new(130.0, 540.0), Vec2::new(-0.4, 0.0));

        bounce_off_paddles(&mut world, &config, &mut events);

        let ball = ball(&world);
        assert_eq!(ball.direction, Vec2::new(0.4, 0.0));
        assert_eq!(ball.base_speed, 35.0);
        assert_eq!(ball.speed, 35.0);
        assert_eq!(
            events.queue,
            vec![GameEvent::BallHitPaddle {
                player: PlayerId::One
            }]
        );
    }

    #[test]
    fn test_ball_collides_with_right_paddle_and_takes_english() {
        let (mut world, config, mut events) = setup_world();
        for (_e, paddle) in world.query_mut::<&mut Paddle>() {
            if paddle.player == PlayerId::Two {
                paddle.velocity_sign = -1;
            }
        }
        spawn_ball(&mut world, &config, Vec2::new(1790.0, 540.0), Vec2::new(0.4, 0.25));

        bounce_off_paddles(&mut world, &config, &mut events);

        let ball = ball(&world);
        assert_eq!(ball.direction, Vec2::new(-0.4, -0.75));
    }

    #[test]
    fn test_hit_applies_hitter_ball_speed_multiplier() {
        let (mut world, config, mut events) = setup_world();
        for (_e, (paddle, m)) in world.query_mut::<(&Paddle, &mut PlayerModifiers)>() {
            if paddle.player == PlayerId::One {
                m.set_class(3);
            }
        }
        spawn_ball(&mut world, &config, Vec2::new(130.0, 540.0), Vec2::new(-0.4, 0.0));

        bounce_off_paddles(&mut world, &config, &mut events);

        let ball = ball(&world);
        assert_eq!(ball.base_speed, 35.0);
        assert!((ball.speed - 42.0).abs() < 1e-4);
    }

    #[test]
    fn test_ball_speed_caps_at_max() {
        let (mut world, config, mut events) = setup_world();
        spawn_ball(&mut world, &config, Vec2::new(130.0, 540.0), Vec2::new(-0.4, 0.0));
        for (_e, ball) in world.query_mut::<&mut Ball>() {
            ball.base_speed = 58.0;
        }

        bounce_off_paddles(&mut world, &config, &mut events);

        assert_eq!(ball(&world).base_speed, config.ball_speed_max);
    }

    #[test]
    fn test_ball_does_not_bounce_when_moving_away_from_paddle() {
        let (mut world, config, mut events) = setup_world();
        spawn_ball(&mut world, &config, Vec2::new(130.0, 540.0), Vec2::new(0.4, 0.0));

        bounce_off_paddles(&mut world, &config, &mut events);

        let ball = ball(&world);
        assert_eq!(ball.direction, Vec2::new(0.4, 0.0));
        assert_eq!(ball.base_speed, 30.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_no_collision_when_vertically_clear() {
        let (mut world, config, mut events) = setup_world();
        spawn_ball(&mut world, &config, Vec2::new(130.0, 100.0), Vec2::new(-0.4, 0.0));

        bounce_off_paddles(&mut world, &config, &mut events);

        assert!(events.is_empty());
    }
}
