//! Decision service backed by an external HTTP endpoint.
//!
//! Every decision is one `POST` of `{ state, seat, request }` to the
//! configured URL. The response body is the typed answer for that request.
//! Calls carry no timeout; a stalled call is abandoned when the game's
//! epoch is bumped.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::trait_def::{AiError, DecisionService};
use crate::domain::events::WitchChoice;
use crate::domain::roles::Role;
use crate::domain::state::{Day, GameState, Seat, SpeechKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionRequest {
    Speak { speech: SpeechKind },
    Vote,
    NightTarget { role: Role },
    Witch,
    Shot,
    SummarizeDay { day: Day },
}

impl DecisionRequest {
    fn label(&self) -> &'static str {
        match self {
            DecisionRequest::Speak { .. } => "speak",
            DecisionRequest::Vote => "vote",
            DecisionRequest::NightTarget { .. } => "night_target",
            DecisionRequest::Witch => "witch",
            DecisionRequest::Shot => "shot",
            DecisionRequest::SummarizeDay { .. } => "summarize_day",
        }
    }
}

#[derive(Serialize)]
struct DecisionEnvelope<'a> {
    state: &'a GameState,
    seat: Seat,
    request: DecisionRequest,
}

#[derive(Deserialize)]
struct SpeechResponse {
    fragments: Vec<String>,
}

#[derive(Deserialize)]
struct TargetResponse {
    target: Option<Seat>,
}

#[derive(Deserialize)]
struct WitchResponse {
    choice: WitchChoice,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

pub struct RemoteDecisionService {
    client: Client,
    url: String,
}

impl RemoteDecisionService {
    pub const NAME: &'static str = "Remote";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    async fn call<R: DeserializeOwned>(
        &self,
        state: &GameState,
        seat: Seat,
        request: DecisionRequest,
    ) -> Result<R, AiError> {
        debug!(game_id = %state.game_id, seat, request = request.label(), "Remote decision request");
        let response = self
            .client
            .post(&self.url)
            .json(&DecisionEnvelope {
                state,
                seat,
                request,
            })
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Transport(format!(
                "{} answered {status}",
                request.label()
            )));
        }
        response
            .json::<R>()
            .await
            .map_err(|e| AiError::InvalidMove(format!("unparseable {} response: {e}", request.label())))
    }
}

#[async_trait]
impl DecisionService for RemoteDecisionService {
    async fn speak(
        &self,
        state: &GameState,
        seat: Seat,
        kind: SpeechKind,
    ) -> Result<Vec<String>, AiError> {
        let r: SpeechResponse = self
            .call(state, seat, DecisionRequest::Speak { speech: kind })
            .await?;
        Ok(r.fragments)
    }

    async fn choose_vote(&self, state: &GameState, seat: Seat) -> Result<Seat, AiError> {
        let r: TargetResponse = self.call(state, seat, DecisionRequest::Vote).await?;
        r.target
            .ok_or_else(|| AiError::InvalidMove("vote without a target".into()))
    }

    async fn choose_night_target(
        &self,
        state: &GameState,
        seat: Seat,
        role: Role,
    ) -> Result<Option<Seat>, AiError> {
        let r: TargetResponse = self
            .call(state, seat, DecisionRequest::NightTarget { role })
            .await?;
        Ok(r.target)
    }

    async fn choose_witch_action(
        &self,
        state: &GameState,
        seat: Seat,
    ) -> Result<WitchChoice, AiError> {
        let r: WitchResponse = self.call(state, seat, DecisionRequest::Witch).await?;
        Ok(r.choice)
    }

    async fn choose_shot(&self, state: &GameState, seat: Seat) -> Result<Option<Seat>, AiError> {
        let r: TargetResponse = self.call(state, seat, DecisionRequest::Shot).await?;
        Ok(r.target)
    }

    async fn summarize_day(&self, state: &GameState, day: Day) -> Result<String, AiError> {
        // Summaries are not tied to a seat; the narrator speaks for seat 0.
        let r: SummaryResponse = self
            .call(state, 0, DecisionRequest::SummarizeDay { day })
            .await?;
        Ok(r.summary)
    }
}
