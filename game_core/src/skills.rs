//! Skill catalog
//!
//! Each skill is evaluated against the current world for the acting player and
//! reports whether it took effect. Timed effects record their expiry in
//! [`ActiveEffects`]; [`expire_effects`] reverts them from the tick step.

use crate::{Ball, Body, MatchConfig, Paddle, PlayerId, PlayerModifiers};
use hecs::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skill {
    TeleportAssist,
    SlowTime,
    InvertOpponent,
}

/// Expiry timestamps (ms) of the timed skill effects in play
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    pub slowed_until: Option<u64>,
    pub inverted_until: [Option<u64>; 2],
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_slowed(&self) -> bool {
        self.slowed_until.is_some()
    }

    /// Factor applied to ball travel: the caster's factor while time is slowed
    pub fn ball_time_factor(&self, config: &MatchConfig) -> f32 {
        if self.is_slowed() {
            config.slow_time_caster_factor
        } else {
            1.0
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Run `skill` for `player`. Returns whether it took effect.
pub fn activate(
    skill: Skill,
    world: &mut World,
    effects: &mut ActiveEffects,
    config: &MatchConfig,
    player: PlayerId,
    now: u64,
) -> bool {
    match skill {
        Skill::TeleportAssist => teleport_assist(world, config, player),
        Skill::SlowTime => slow_time(world, effects, config, player, now),
        Skill::InvertOpponent => invert_opponent(world, effects, config, player, now),
    }
}

/// Pull the ball back toward mid-court when it is deep on the caster's side,
/// and line it up with the caster's paddle.
pub fn teleport_assist(world: &mut World, config: &MatchConfig, player: PlayerId) -> bool {
    let paddle_y = crate::paddle_body(world, player).map(|body| body.center.y);

    let zone = config.arena_width * config.teleport_zone;
    let snap = config.arena_width * config.teleport_snap;

    for (_entity, (body, _ball)) in world.query_mut::<(&mut Body, &Ball)>() {
        match player {
            PlayerId::One if body.center.x < zone => body.center.x += snap,
            PlayerId::Two if body.center.x > config.arena_width - zone => body.center.x -= snap,
            _ => {}
        }
        if let Some(y) = paddle_y {
            body.center.y = y;
        }
    }
    true
}

/// Slow both players' inputs, the opponent more than the caster.
/// Only one slow-time may be active match-wide.
pub fn slow_time(
    world: &mut World,
    effects: &mut ActiveEffects,
    config: &MatchConfig,
    player: PlayerId,
    now: u64,
) -> bool {
    if effects.is_slowed() {
        return false;
    }

    for (_entity, (paddle, modifiers)) in world.query_mut::<(&Paddle, &mut PlayerModifiers)>() {
        modifiers.time_factor = if paddle.player == player {
            config.slow_time_caster_factor
        } else {
            config.slow_time_opponent_factor
        };
    }
    effects.slowed_until = Some(now + config.slow_time_duration_ms);
    true
}

/// Invert the opponent's paddle controls
pub fn invert_opponent(
    world: &mut World,
    effects: &mut ActiveEffects,
    config: &MatchConfig,
    player: PlayerId,
    now: u64,
) -> bool {
    let opponent = player.opponent();
    let mut applied = false;

    for (_entity, (paddle, modifiers)) in world.query_mut::<(&Paddle, &mut PlayerModifiers)>() {
        if paddle.player == opponent && modifiers.paddle_speed_multiplier > 0.0 {
            modifiers.paddle_invert_sign = -1.0;
            applied = true;
        }
    }

    if applied {
        effects.inverted_until[opponent.index()] = Some(now + config.invert_duration_ms);
    }
    applied
}

/// Revert timed effects whose expiry has passed
pub fn expire_effects(world: &mut World, effects: &mut ActiveEffects, now: u64) {
    let slow_expired = matches!(effects.slowed_until, Some(until) if now >= until);
    let invert_expired: Vec<PlayerId> = PlayerId::ALL
        .into_iter()
        .filter(|p| matches!(effects.inverted_until[p.index()], Some(until) if now >= until))
        .collect();

    if !slow_expired && invert_expired.is_empty() {
        return;
    }

    for (_entity, (paddle, modifiers)) in world.query_mut::<(&Paddle, &mut PlayerModifiers)>() {
        if slow_expired {
            modifiers.time_factor = 1.0;
        }
        if invert_expired.contains(&paddle.player) {
            modifiers.paddle_invert_sign = 1.0;
        }
    }

    if slow_expired {
        effects.slowed_until = None;
    }
    for player in invert_expired {
        effects.inverted_until[player.index()] = None;
    }
}
