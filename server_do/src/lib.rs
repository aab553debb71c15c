pub mod config;
pub mod game_state;
pub mod recorder;
pub mod scheduler;


use crate::config::ServerConfig;
use crate::game_state::{GameState, TickOutcome, WasmEnv};
use crate::recorder::HttpRecorder;
use game_core::{MatchResult, PlayerId};
use proto::C2S;
use std::cell::RefCell;
use worker::*;

#[durable_object]
pub struct MatchDO {
    state: State,
    game_state: RefCell<GameState>,
}

impl DurableObject for MatchDO {
    fn new(state: State, env: Env) -> Self {
        let config = ServerConfig::from_env(&env);
        console_log!(
            "DO: Created (tick={}ms, stride={}, idle={}s, recorder={})",
            config.tick_interval_ms,
            config.snapshot_stride,
            config.idle_timeout_secs,
            config.recorder_url.is_some()
        );

        Self {
            state,
            game_state: RefCell::new(GameState::new(Box::new(WasmEnv), config)),
        }
    }

    async fn fetch(&self, req: Request) -> Result<Response> {
        let url = req.url()?;

        let Some(user_id) = url
            .query_pairs()
            .find(|(key, _)| key == "user")
            .and_then(|(_, value)| value.parse::<u64>().ok())
        else {
            return Response::error("Missing or invalid user id", 400);
        };

        let upgrade = req
            .headers()
            .get("Upgrade")?
            .unwrap_or_default()
            .to_ascii_lowercase();
        if upgrade != "websocket" {
            return Response::error("Expected WebSocket upgrade request", 426);
        }

        let Some(slot) = self.game_state.borrow().next_free_slot() else {
            console_log!("DO: Match full, rejecting user {}", user_id);
            return Response::error("Match is full", 409);
        };

        let pair = WebSocketPair::new()?;
        let server = pair.server;
        let client = pair.client;

        let tag = slot.number().to_string();
        self.state
            .accept_websocket_with_tags(&server, &[tag.as_str()]);

        let joined = self
            .game_state
            .borrow_mut()
            .add_player(user_id, Box::new(server));

        match joined {
            Some((_slot, true)) => {
                let interval = self.game_state.borrow().scheduler.interval();
                self.state.storage().set_alarm(interval).await?;
            }
            Some((_slot, false)) => {}
            None => return Response::error("Match is full", 409),
        }

        Response::from_websocket(client)
    }

    async fn websocket_message(
        &self,
        ws: WebSocket,
        message: durable::WebSocketIncomingMessage,
    ) -> Result<()> {
        let bytes = match message {
            durable::WebSocketIncomingMessage::Binary(bytes) => bytes,
            // Ignore text messages
            durable::WebSocketIncomingMessage::String(_text) => return Ok(()),
        };

        let Some(slot) = self.slot_of(&ws) else {
            console_error!("DO: Message from untagged socket");
            return Ok(());
        };

        let finished = match C2S::from_bytes(&bytes) {
            Ok(C2S::Input {
                player_id,
                action,
                seq: _, // Client sequence number (not used by server)
            }) => self
                .game_state
                .borrow_mut()
                .handle_input(slot, player_id, action),
            Ok(C2S::Ping { t_ms }) => {
                self.game_state.borrow_mut().handle_ping(slot, t_ms);
                None
            }
            Err(e) => {
                console_error!("DO: Failed to parse C2S message: {e:?}");
                None
            }
        };

        if let Some(result) = finished {
            self.record_result(result).await;
        }
        Ok(())
    }

    async fn websocket_close(
        &self,
        ws: WebSocket,
        code: usize,
        reason: String,
        _was_clean: bool,
    ) -> Result<()> {
        console_log!(
            "DO: WebSocket close event (code: {}, reason: {})",
            code,
            reason
        );

        let Some(slot) = self.slot_of(&ws) else {
            return Ok(());
        };

        let finished = self.game_state.borrow_mut().remove_player(slot);
        if let Some(result) = finished {
            self.record_result(result).await;
        }
        Ok(())
    }

    async fn websocket_error(&self, _ws: WebSocket, error: Error) -> Result<()> {
        console_error!("DO: WebSocket error: {:?}", error);
        Ok(())
    }

    async fn alarm(&self) -> Result<Response> {
        let outcome = self.game_state.borrow_mut().run_tick();

        match outcome {
            TickOutcome::Continue => {
                let interval = self.game_state.borrow().scheduler.interval();
                self.state.storage().set_alarm(interval).await?;
                Response::ok("Alarm processed")
            }
            TickOutcome::Stopped => Response::ok("Scheduler stopped"),
            TickOutcome::Finished(result) => {
                self.record_result(result).await;
                Response::ok("Match finished")
            }
        }
    }
}

impl MatchDO {
    /// Slot assigned to a socket when it was accepted
    fn slot_of(&self, ws: &WebSocket) -> Option<PlayerId> {
        self.state
            .get_tags(ws)
            .first()
            .and_then(|tag| tag.parse::<u8>().ok())
            .and_then(|number| PlayerId::try_from(number).ok())
    }

    /// Persist the result, then announce the final record to both players.
    /// The scheduler is already stopped when this runs.
    async fn record_result(&self, result: MatchResult) {
        let endpoint = self.game_state.borrow().config.recorder_url.clone();

        let recorded = match endpoint {
            Some(endpoint) => HttpRecorder::new(endpoint)
                .record(&result)
                .await
                .map_err(|e| e.to_string()),
            None => Err("MATCH_API_URL is not configured".to_string()),
        };

        self.game_state
            .borrow_mut()
            .complete_match(&result, recorded);
    }
}
