use crate::{Ball, Body, MatchConfig, PlayerId};
use hecs::World;

/// Check if ball left the arena. Returns the player who scored.
pub fn check_out_of_bounds(world: &World, config: &MatchConfig) -> Option<PlayerId> {
    let mut query = world.query::<(&Ball, &Body)>();
    let scorer = query.iter().find_map(|(_e, (_ball, body))| {
        if body.right() < 0.0 {
            // Past the left edge: right player scores
            Some(PlayerId::Two)
        } else if body.left() > config.arena_width {
            Some(PlayerId::One)
        } else {
            None
        }
    });
    scorer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_ball;
    use glam::Vec2;

    fn setup_world() -> (World, MatchConfig) {
        (World::new(), MatchConfig::new())
    }

    #[test]
    fn test_right_player_scores_when_ball_exits_left() {
        let (mut world, config) = setup_world();
        create_ball(&mut world, &config, Vec2::new(-30.5, 540.0));

        assert_eq!(check_out_of_bounds(&world, &config), Some(PlayerId::Two));
    }

    #[test]
    fn test_left_player_scores_when_ball_exits_right() {
        let (mut world, config) = setup_world();
        create_ball(&mut world, &config, Vec2::new(config.arena_width + 30.5, 540.0));

        assert_eq!(check_out_of_bounds(&world, &config), Some(PlayerId::One));
    }

    #[test]
    fn test_ball_partially_out_is_still_in_play() {
        let (mut world, config) = setup_world();
        // Right edge exactly on the arena edge
        create_ball(&mut world, &config, Vec2::new(-30.0, 540.0));

        assert_eq!(check_out_of_bounds(&world, &config), None);
    }

    #[test]
    fn test_no_scoring_when_ball_in_bounds() {
        let (mut world, config) = setup_world();
        create_ball(&mut world, &config, Vec2::new(960.0, 540.0));

        assert_eq!(check_out_of_bounds(&world, &config), None);
    }
}
