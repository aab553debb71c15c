use crate::config::ServerConfig;
use crate::recorder;
use crate::scheduler::TickScheduler;
use game_core::*;
use js_sys::Date;
use proto::*;
use std::collections::HashMap;
use worker::*;

/// Server-side match lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Waiting for the second player to join
    Waiting,
    /// Both players connected, simulation running
    Playing,
    /// Match decided
    GameOver,
}

/// Result of one scheduler tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Still running, re-arm the alarm
    Continue,
    /// Not running, nothing to do
    Stopped,
    /// Match just ended; hand the result to the recorder
    Finished(MatchResult),
}

// Abstract connection for testing
pub trait GameClient {
    fn send_bytes(&self, bytes: &[u8]) -> Result<()>;
}

impl GameClient for WebSocket {
    fn send_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.send_with_bytes(bytes)
    }
}

// Abstract environment (Time, Logging)
pub trait Environment {
    fn now(&self) -> u64; // ms
    fn log(&self, msg: String);
    fn error(&self, msg: String);
}

pub struct WasmEnv;

impl Environment for WasmEnv {
    fn now(&self) -> u64 {
        Date::now() as u64
    }

    fn log(&self, msg: String) {
        console_log!("{}", msg);
    }

    fn error(&self, msg: String) {
        console_error!("{}", msg);
    }
}

// Track client activity
pub struct ClientInfo {
    pub client: Box<dyn GameClient>,
    pub user_id: u64,
    pub last_activity: u64, // Unix timestamp in seconds
}

// Game state wrapper for interior mutability
pub struct GameState {
    pub env: Box<dyn Environment>,
    pub config: ServerConfig,
    pub sim: Option<Match>,
    pub scheduler: TickScheduler,
    pub clients: HashMap<PlayerId, ClientInfo>,
    pub match_state: MatchState,
    pub last_input: HashMap<PlayerId, i8>, // Track last move per player to reduce logging
    pending_result: Option<MatchResult>,
}

impl GameState {
    pub fn new(env: Box<dyn Environment>, config: ServerConfig) -> Self {
        let scheduler = TickScheduler::new(config.tick_interval_ms, config.snapshot_stride);
        Self {
            env,
            config,
            sim: None,
            scheduler,
            clients: HashMap::new(),
            match_state: MatchState::Waiting,
            last_input: HashMap::new(),
            pending_result: None,
        }
    }

    /// Lowest free slot, if any
    pub fn next_free_slot(&self) -> Option<PlayerId> {
        if self.match_state != MatchState::Waiting {
            return None;
        }
        PlayerId::ALL
            .into_iter()
            .find(|slot| !self.clients.contains_key(slot))
    }

    pub fn has_free_slot(&self) -> bool {
        self.next_free_slot().is_some()
    }

    /// Try to add a player. Returns (slot, scheduler_started) if successful.
    pub fn add_player(
        &mut self,
        user_id: u64,
        client: Box<dyn GameClient>,
    ) -> Option<(PlayerId, bool)> {
        let slot = self.next_free_slot()?;
        let now = self.env.now() / 1000;

        self.env
            .log(format!("DO: User {user_id} joining as player {}", slot.number()));
        self.clients.insert(
            slot,
            ClientInfo {
                client,
                user_id,
                last_activity: now,
            },
        );
        self.send_to(
            slot,
            &S2C::Welcome {
                player_id: slot.number(),
            },
        );

        if self.clients.len() < 2 {
            return Some((slot, false));
        }

        // Both slots filled: create the match and start ticking
        let user_ids = PlayerId::ALL.map(|p| self.clients.get(&p).map_or(0, |c| c.user_id));
        let match_config = MatchConfig {
            tick_interval_ms: self.config.tick_interval_ms,
            ..MatchConfig::new()
        };
        self.sim = Some(Match::new(match_config, user_ids));
        self.match_state = MatchState::Playing;
        self.env
            .log("DO: Both players connected, starting match".to_string());

        self.broadcast_to_all(&S2C::MatchFound);
        self.broadcast_state();
        let started = self.scheduler.start();

        Some((slot, started))
    }

    /// Player left (socket closed or idle). Forfeits a running match.
    pub fn remove_player(&mut self, slot: PlayerId) -> Option<MatchResult> {
        self.clients.remove(&slot)?;
        self.last_input.remove(&slot);
        self.env
            .log(format!("DO: Player {} removed", slot.number()));

        if self.match_state != MatchState::Playing {
            return None;
        }

        if let Some(sim) = self.sim.as_mut() {
            self.env.log(format!(
                "DO: Player {} left, awarding match to player {}",
                slot.number(),
                slot.opponent().number()
            ));
            if let Err(e) = sim.abort(slot) {
                self.env.error(format!("DO: Forfeit failed: {e}"));
            }
        }
        self.flush_events();
        self.pending_result.take()
    }

    /// Apply one input from the socket bound to `slot`
    pub fn handle_input(
        &mut self,
        slot: PlayerId,
        player_id: u8,
        action: PlayerAction,
    ) -> Option<MatchResult> {
        self.touch(slot);

        // Sockets may only drive their own paddle
        if matches!(PlayerId::try_from(player_id), Ok(declared) if declared != slot) {
            self.reject(slot, "Input for another player".to_string());
            return None;
        }

        if let PlayerAction::Move { dir } = action {
            let last_dir = self.last_input.get(&slot).copied();
            if last_dir != Some(dir) {
                self.env.log(format!(
                    "DO: Player {} input changed: {:?} -> {}",
                    slot.number(),
                    last_dir,
                    dir
                ));
                self.last_input.insert(slot, dir);
            }
        }

        if self.sim.is_none() {
            self.reject(slot, "Match has not started".to_string());
            return None;
        }
        let now = self.env.now();
        let sim = self.sim.as_mut()?;

        let outcome = match action {
            PlayerAction::Loaded { ready } => sim.set_loaded(player_id, ready),
            PlayerAction::Move { dir } => sim.move_paddle(player_id, dir),
            PlayerAction::Stop => sim.stop_paddle(player_id),
            PlayerAction::Serve => sim.start_serve(player_id).map(|_| ()),
            PlayerAction::ActivateSkill => sim.activate_skill(player_id, now).map(|_| ()),
            PlayerAction::ChooseClass { class_id } => {
                sim.choose_class(player_id, class_id).map(|_| ())
            }
        };

        if let Err(e) = outcome {
            self.reject(slot, e.to_string());
        }

        self.flush_events();
        self.pending_result.take()
    }

    pub fn handle_ping(&mut self, slot: PlayerId, t_ms: u32) {
        self.touch(slot);
        self.send_to(slot, &S2C::Pong { t_ms });
    }

    /// Run one scheduled tick: idle sweep, simulation step, snapshot, events
    pub fn run_tick(&mut self) -> TickOutcome {
        if !self.scheduler.is_running() {
            return TickOutcome::Stopped;
        }

        // Check for idle clients and disconnect them
        let now_secs = self.env.now() / 1000;
        let idle: Vec<PlayerId> = self
            .clients
            .iter()
            .filter(|(_, info)| {
                now_secs.saturating_sub(info.last_activity) > self.config.idle_timeout_secs
            })
            .map(|(slot, _)| *slot)
            .collect();
        for slot in idle {
            self.env.log(format!(
                "DO: Player {} idle for over {}s, disconnecting",
                slot.number(),
                self.config.idle_timeout_secs
            ));
            if let Some(result) = self.remove_player(slot) {
                return TickOutcome::Finished(result);
            }
        }

        let now = self.env.now();
        let Some(sim) = self.sim.as_mut() else {
            return TickOutcome::Continue;
        };

        if let Err(e) = sim.step(now) {
            self.env.error(format!("DO: Step failed: {e}"));
            self.scheduler.stop();
            return TickOutcome::Stopped;
        }

        if sim.tick() % 600 == 0 {
            self.env.log(format!(
                "DO: Game running, tick={}, clients={}",
                sim.tick(),
                self.clients.len()
            ));
        }

        if self.scheduler.advance() {
            self.broadcast_state();
        }
        self.flush_events();

        match self.pending_result.take() {
            Some(result) => TickOutcome::Finished(result),
            None if self.scheduler.is_running() => TickOutcome::Continue,
            None => TickOutcome::Stopped,
        }
    }

    /// Forward queued simulation events to the clients.
    /// `MatchOver` stops the scheduler before anything else sees the result.
    pub fn flush_events(&mut self) {
        let events = match self.sim.as_mut() {
            Some(sim) => sim.drain_events(),
            None => return,
        };

        for event in events {
            match event {
                GameEvent::PointReset { scorer } => {
                    let score = self.sim.as_ref().map(|s| s.score()).unwrap_or_default();
                    self.env.log(format!(
                        "DO: Player {} scored ({}-{})",
                        scorer.number(),
                        score.player1,
                        score.player2
                    ));
                    self.broadcast_to_all(&S2C::PointReset {
                        scorer: scorer.number(),
                    });
                }
                GameEvent::SkillReady { player } => {
                    self.broadcast_to_all(&S2C::SkillReady {
                        player_id: player.number(),
                    });
                }
                GameEvent::SkillConsumed { player } => {
                    self.broadcast_to_all(&S2C::SkillConsumed {
                        player_id: player.number(),
                    });
                }
                GameEvent::MatchOver(result) => {
                    self.scheduler.stop();
                    self.match_state = MatchState::GameOver;
                    self.env.log(format!(
                        "DO: Match over, winner {} ({}-{})",
                        result.winner_id, result.p1_score, result.p2_score
                    ));
                    if self.pending_result.is_none() {
                        self.pending_result = Some(result);
                    }
                }
                GameEvent::BallHitPaddle { .. } | GameEvent::BallHitWall => {}
            }
        }
    }

    /// Announce the final record. `recorded` is the match API outcome.
    pub fn complete_match(
        &mut self,
        result: &MatchResult,
        recorded: std::result::Result<MatchRecord, String>,
    ) -> MatchRecord {
        let record = match recorded {
            Ok(record) => record,
            Err(reason) => {
                self.env
                    .error(format!("DO: {}", MatchError::RecordingFailed(reason)));
                recorder::unrecorded(result)
            }
        };
        self.broadcast_to_all(&S2C::MatchFinished(record.clone()));
        record
    }

    pub fn generate_state_message(&self) -> Option<S2C> {
        let sim = self.sim.as_ref()?;
        let snapshot = sim.snapshot(self.env.now());
        let point = |v: Vec2| Point::new(v.x, v.y);

        Some(S2C::GameState(GameStateSnapshot {
            tick: snapshot.tick,
            timestamp: snapshot.timestamp,
            ball: point(snapshot.ball),
            direction: point(snapshot.direction),
            paddle1: point(snapshot.paddles[0]),
            paddle2: point(snapshot.paddles[1]),
            paddle1_size: point(snapshot.paddle_sizes[0]),
            paddle2_size: point(snapshot.paddle_sizes[1]),
            score1: snapshot.score.player1,
            score2: snapshot.score.player2,
        }))
    }

    pub fn broadcast_state(&self) {
        if let Some(msg) = self.generate_state_message() {
            self.broadcast_to_all(&msg);
        }
    }

    /// Broadcast a message to all connected clients
    pub fn broadcast_to_all(&self, msg: &S2C) {
        match msg.to_bytes() {
            Ok(bytes) => {
                for client_info in self.clients.values() {
                    let _ = client_info.client.send_bytes(&bytes);
                }
            }
            Err(e) => self.env.error(format!("DO: Failed to serialize {msg:?}: {e}")),
        }
    }

    pub fn send_to(&self, slot: PlayerId, msg: &S2C) {
        let Some(client_info) = self.clients.get(&slot) else {
            return;
        };
        match msg.to_bytes() {
            Ok(bytes) => {
                let _ = client_info.client.send_bytes(&bytes);
            }
            Err(e) => self.env.error(format!("DO: Failed to serialize {msg:?}: {e}")),
        }
    }

    fn reject(&self, slot: PlayerId, reason: String) {
        self.env
            .log(format!("DO: Rejected input from player {}: {reason}", slot.number()));
        self.send_to(slot, &S2C::Rejected { reason });
    }

    fn touch(&mut self, slot: PlayerId) {
        let now = self.env.now() / 1000;
        if let Some(client_info) = self.clients.get_mut(&slot) {
            client_info.last_activity = now;
        }
    }
}
