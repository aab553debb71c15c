//! Authoritative match simulation
//!
//! A [`Match`] owns the ball, both paddles (with their modifiers), the score and
//! the serve state. It is mutated only through its input API and [`Match::step`],
//! which the tick scheduler calls once per interval. Discrete notifications are
//! queued as [`GameEvent`]s and drained by the owner after every call.
//!
//! Phases: `AwaitingLoad -> Serving -> Rallying -> (AwaitingLoad | MatchOver)`.

use crate::systems::*;
use crate::{
    ball_body, create_ball, create_paddle, paddle_body, skills, ActiveEffects, Ball, Body,
    Events, GameEvent, MatchConfig, MatchError, MatchResult, Paddle, PlayerId, PlayerModifiers,
    Score,
};
use glam::Vec2;
use hecs::World;

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for both clients to report loaded
    AwaitingLoad,
    /// Both loaded, waiting for the serving player to serve
    Serving,
    /// Ball in play
    Rallying,
    /// Winning score reached
    MatchOver,
}

/// State broadcast to both clients every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub tick: u32,
    pub timestamp: u64,
    pub ball: Vec2,
    pub direction: Vec2,
    pub paddles: [Vec2; 2],
    pub paddle_sizes: [Vec2; 2],
    pub score: Score,
}

pub struct Match {
    world: World,
    config: MatchConfig,
    phase: Phase,
    serving: PlayerId,
    score: Score,
    loaded: [bool; 2],
    user_ids: [u64; 2],
    effects: ActiveEffects,
    events: Events,
    tick: u32,
}

impl Match {
    /// Create a match for two paired users. Player one serves first.
    pub fn new(config: MatchConfig, user_ids: [u64; 2]) -> Self {
        let mut world = World::new();
        create_paddle(&mut world, &config, PlayerId::One);
        create_paddle(&mut world, &config, PlayerId::Two);
        create_ball(&mut world, &config, config.serve_position(PlayerId::One));

        Self {
            world,
            config,
            phase: Phase::AwaitingLoad,
            serving: PlayerId::One,
            score: Score::new(),
            loaded: [false; 2],
            user_ids,
            effects: ActiveEffects::new(),
            events: Events::new(),
            tick: 0,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::MatchOver
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn serving_player(&self) -> PlayerId {
        self.serving
    }

    pub fn is_loaded(&self, player: PlayerId) -> bool {
        self.loaded[player.index()]
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn user_id(&self, player: PlayerId) -> u64 {
        self.user_ids[player.index()]
    }

    pub fn effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn ball(&self) -> Ball {
        let mut query = self.world.query::<&Ball>();
        let ball = query
            .iter()
            .next()
            .map(|(_e, ball)| *ball)
            .unwrap_or_else(|| Ball::new(self.config.ball_speed_base));
        ball
    }

    pub fn ball_body(&self) -> Body {
        ball_body(&self.world).unwrap_or_else(|| {
            Body::new(
                self.config.serve_position(self.serving),
                Vec2::splat(self.config.ball_size),
            )
        })
    }

    pub fn paddle_body(&self, player: PlayerId) -> Body {
        paddle_body(&self.world, player).unwrap_or_else(|| {
            Body::new(
                Vec2::new(self.config.paddle_x(player), self.config.arena_height / 2.0),
                Vec2::new(self.config.paddle_width, self.config.paddle_height),
            )
        })
    }

    pub fn modifiers(&self, player: PlayerId) -> PlayerModifiers {
        let mut query = self.world.query::<(&Paddle, &PlayerModifiers)>();
        let modifiers = query
            .iter()
            .find(|(_e, (paddle, _))| paddle.player == player)
            .map(|(_e, (_, modifiers))| *modifiers)
            .unwrap_or_default();
        modifiers
    }

    /// Take the notifications produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    // ------------------------------------------------------------------
    // Input API
    // ------------------------------------------------------------------

    pub fn set_loaded(&mut self, player: u8, ready: bool) -> Result<(), MatchError> {
        self.ensure_live()?;
        let player = PlayerId::try_from(player)?;

        self.loaded[player.index()] = ready;
        let all_loaded = self.loaded.iter().all(|&l| l);
        match self.phase {
            Phase::AwaitingLoad if all_loaded => self.phase = Phase::Serving,
            Phase::Serving if !all_loaded => self.phase = Phase::AwaitingLoad,
            _ => {}
        }
        Ok(())
    }

    /// Move a paddle one step. `sign` is clamped to -1, 0 or 1.
    pub fn move_paddle(&mut self, player: u8, sign: i8) -> Result<(), MatchError> {
        self.ensure_live()?;
        let player = PlayerId::try_from(player)?;
        self.ensure_loaded()?;

        let carry_ball = self.phase != Phase::Rallying && player == self.serving;
        move_paddle(&mut self.world, &self.config, player, sign.signum(), carry_ball);
        Ok(())
    }

    pub fn stop_paddle(&mut self, player: u8) -> Result<(), MatchError> {
        self.ensure_live()?;
        let player = PlayerId::try_from(player)?;

        stop_paddle(&mut self.world, player);
        Ok(())
    }

    /// Serve the ball. Returns false when `player` isn't the one due to serve
    /// or a rally is already running.
    pub fn start_serve(&mut self, player: u8) -> Result<bool, MatchError> {
        self.ensure_live()?;
        let player = PlayerId::try_from(player)?;
        self.ensure_loaded()?;

        if self.phase != Phase::Serving || player != self.serving {
            return Ok(false);
        }

        let config = &self.config;
        let multiplier = self.modifiers(player).ball_speed_multiplier;
        for (_entity, (body, ball)) in self.world.query_mut::<(&Body, &mut Ball)>() {
            // Delta to centre over arena extents, not normalized
            ball.direction = Vec2::new(
                (body.center.x - config.arena_width / 2.0) / config.arena_width,
                (config.arena_height / 2.0 - body.center.y) / config.arena_height,
            );
            ball.speed = ball.base_speed * multiplier;
        }

        self.phase = Phase::Rallying;
        Ok(true)
    }

    /// Use the player's class skill. Returns whether it took effect.
    pub fn activate_skill(&mut self, player: u8, now: u64) -> Result<bool, MatchError> {
        self.ensure_live()?;
        let player = PlayerId::try_from(player)?;

        if self.phase != Phase::Rallying {
            return Ok(false);
        }
        let modifiers = self.modifiers(player);
        let Some(skill) = modifiers.skill() else {
            return Ok(false);
        };
        if modifiers.in_cooldown {
            return Ok(false);
        }

        let activated = skills::activate(
            skill,
            &mut self.world,
            &mut self.effects,
            &self.config,
            player,
            now,
        );
        if activated {
            self.update_modifiers(player, |m| m.begin_cooldown(now));
            self.events.push(GameEvent::SkillConsumed { player });
        }
        Ok(activated)
    }

    /// Pick a skill class. Ignored (false) while a rally is in progress.
    pub fn choose_class(&mut self, player: u8, class_id: u8) -> Result<bool, MatchError> {
        self.ensure_live()?;
        let player = PlayerId::try_from(player)?;

        if self.phase == Phase::Rallying {
            return Ok(false);
        }

        let config = &self.config;
        for (_entity, (paddle, body, modifiers)) in self
            .world
            .query_mut::<(&Paddle, &mut Body, &mut PlayerModifiers)>()
        {
            if paddle.player == player {
                modifiers.set_class(class_id);
                body.size.y = config.paddle_height * modifiers.paddle_size_multiplier;
                body.center.y = config.clamp_paddle_y(body.center.y, body.size.y);
            }
        }
        Ok(true)
    }

    /// Relocate the ball without touching its direction or speed
    pub fn set_ball_position(&mut self, position: Vec2) -> Result<(), MatchError> {
        self.ensure_live()?;
        for (_entity, (body, _ball)) in self.world.query_mut::<(&mut Body, &Ball)>() {
            body.center = position;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance one logical step. `now` is wall-clock ms, used only for effect
    /// expiry and cooldowns.
    pub fn step(&mut self, now: u64) -> Result<(), MatchError> {
        self.ensure_live()?;
        self.tick += 1;

        skills::expire_effects(&mut self.world, &mut self.effects, now);

        if self.phase == Phase::Rallying {
            let time_factor = self.effects.ball_time_factor(&self.config);
            move_ball(&mut self.world, time_factor);
            bounce_off_walls(&mut self.world, &self.config, &mut self.events);

            if let Some(scorer) = check_out_of_bounds(&self.world, &self.config) {
                clear_paddle_velocity(&mut self.world);
                return self.on_victory(scorer);
            }

            bounce_off_paddles(&mut self.world, &self.config, &mut self.events);
        }

        clear_paddle_velocity(&mut self.world);
        poll_cooldowns(&mut self.world, now, &mut self.events);
        Ok(())
    }

    /// Award a point. Ends the match at the winning score, otherwise resets the
    /// rally with the scorer serving.
    pub fn on_victory(&mut self, scorer: PlayerId) -> Result<(), MatchError> {
        self.ensure_live()?;

        self.score.increment(scorer);
        if self.score.get(scorer) >= self.config.win_score {
            self.phase = Phase::MatchOver;
            let result = self.result(scorer);
            self.events.push(GameEvent::MatchOver(result));
            return Ok(());
        }

        self.serving = scorer;
        self.reset_rally();
        self.events.push(GameEvent::PointReset { scorer });
        Ok(())
    }

    /// End the match because `leaving` dropped out. The remaining player wins
    /// through the ordinary scoring path.
    pub fn abort(&mut self, leaving: PlayerId) -> Result<(), MatchError> {
        self.ensure_live()?;

        let remaining = leaving.opponent();
        self.score
            .raise_to(remaining, self.config.win_score.saturating_sub(1));
        self.on_victory(remaining)
    }

    pub fn snapshot(&self, timestamp: u64) -> Snapshot {
        let ball = self.ball_body();
        let paddles = PlayerId::ALL.map(|player| self.paddle_body(player));
        Snapshot {
            tick: self.tick,
            timestamp,
            ball: ball.center,
            direction: self.ball().direction,
            paddles: paddles.map(|body| body.center),
            paddle_sizes: paddles.map(|body| body.size),
            score: self.score,
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_live(&self) -> Result<(), MatchError> {
        if self.phase == Phase::MatchOver {
            return Err(MatchError::MatchFinished);
        }
        Ok(())
    }

    fn ensure_loaded(&self) -> Result<(), MatchError> {
        if self.loaded.iter().all(|&l| l) {
            Ok(())
        } else {
            Err(MatchError::NotLoaded)
        }
    }

    fn update_modifiers(&mut self, player: PlayerId, apply: impl FnOnce(&mut PlayerModifiers)) {
        let mut apply = Some(apply);
        for (_entity, (paddle, modifiers)) in
            self.world.query_mut::<(&Paddle, &mut PlayerModifiers)>()
        {
            if paddle.player == player {
                if let Some(apply) = apply.take() {
                    apply(modifiers);
                }
            }
        }
    }

    fn result(&self, winner: PlayerId) -> MatchResult {
        MatchResult {
            p1_id: self.user_ids[0],
            p2_id: self.user_ids[1],
            winner_id: self.user_id(winner),
            p1_score: self.score.player1,
            p2_score: self.score.player2,
            p1_class_id: self.modifiers(PlayerId::One).class.id(),
            p2_class_id: self.modifiers(PlayerId::Two).class.id(),
        }
    }

    /// Put the ball back on the serving player's side and clear rally state
    fn reset_rally(&mut self) {
        let config = &self.config;
        let serve_position = config.serve_position(self.serving);
        let mut rearmed = Vec::new();

        for (_entity, (paddle, body, modifiers)) in self
            .world
            .query_mut::<(&mut Paddle, &mut Body, &mut PlayerModifiers)>()
        {
            if modifiers.in_cooldown {
                rearmed.push(paddle.player);
            }
            modifiers.reset_for_new_rally();
            paddle.velocity_sign = 0;
            body.center.y = config.arena_height / 2.0;
        }

        for (_entity, (body, ball)) in self.world.query_mut::<(&mut Body, &mut Ball)>() {
            body.center = serve_position;
            ball.reset(config.ball_speed_base);
        }

        self.effects.clear();
        self.loaded = [false; 2];
        self.phase = Phase::AwaitingLoad;

        rearmed.sort();
        for player in rearmed {
            self.events.push(GameEvent::SkillReady { player });
        }
    }
}
