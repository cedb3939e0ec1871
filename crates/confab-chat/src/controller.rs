// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation controller: an intent-driven FSM owning one transcript.
//!
//! Phases: Idle -> AwaitingResponse -> Idle, or -> Error on a transport or
//! envelope failure. Error is not sticky; the next send proceeds normally.
//!
//! The controller runs as an actor task that owns all mutable state and
//! processes intents strictly in order, awaiting the transport inline.
//! That single-writer discipline means at most one request is ever in
//! flight and partial state updates can never interleave. State snapshots
//! are published through a `watch` channel; dropping the
//! [`ChatController`] handle aborts the actor, abandoning any in-flight
//! request without touching disposed state.

use std::sync::Arc;

use confab_core::{ConfabError, GenerationConfig, Transcript, Transport, Turn};
use confab_zai::build_request;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::decode;

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to accept a new message.
    Idle,
    /// One request is in flight; the send affordance must be disabled.
    AwaitingResponse,
    /// The last round trip failed; still ready to accept a new message.
    Error,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::AwaitingResponse => write!(f, "awaiting-response"),
            Phase::Error => write!(f, "error"),
        }
    }
}

/// User-facing intents accepted by the controller.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Append a user turn and run one request/response round trip.
    SendMessage(String),
    /// Pure input-buffer mutation; no phase transition.
    UpdateInputText(String),
    /// Live temperature change between turns; no phase transition.
    UpdateTemperature(f64),
    /// Re-send the most recent user turn's text without duplicating it.
    RetryLastMessage,
    /// Reset the transcript to its initial synthesized greeting.
    RestartConversation,
}

/// A published snapshot of controller state.
#[derive(Debug, Clone)]
pub struct ChatState {
    pub input_text: String,
    pub turns: Vec<Turn>,
    pub phase: Phase,
    /// Surface message of the last failure, cleared on the next send.
    pub error: Option<String>,
    pub temperature: f64,
    /// Monotonic publish counter, for callers waiting on settled state.
    pub seq: u64,
}

impl ChatState {
    /// True while a request is in flight; callers disable sending.
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::AwaitingResponse
    }
}

/// Parameterizes one conversation variant: prompt, greeting, generation
/// defaults. The original's near-duplicate variants differ only here.
#[derive(Debug, Clone)]
pub struct ConversationSpec {
    /// System prompt injected as the first provider message.
    pub system_prompt: String,
    /// Greeting content, nominally the same JSON shape as a structured
    /// reply; decoded through the strict tier at construction.
    pub greeting_json: String,
    /// Plain-text greeting used when `greeting_json` does not decode.
    pub fallback_greeting: String,
    pub generation: GenerationConfig,
}

impl ConversationSpec {
    /// Synthesizes the local greeting turn. Never sent to the provider.
    fn greeting_turn(&self) -> Turn {
        let turn = decode::decode_content(&self.greeting_json);
        if turn.is_decode_error {
            Turn::assistant(self.fallback_greeting.clone())
        } else {
            turn
        }
    }
}

/// Handle to a spawned conversation actor.
///
/// Cloning the watch receiver is cheap; intents are fire-and-forget. On
/// drop the actor task is aborted, so an in-flight request is abandoned
/// rather than dispatched into disposed state.
pub struct ChatController {
    intents: mpsc::UnboundedSender<Intent>,
    state: watch::Receiver<ChatState>,
    task: JoinHandle<()>,
}

impl ChatController {
    /// Spawns the conversation actor on the current tokio runtime.
    pub fn spawn(spec: ConversationSpec, transport: Arc<dyn Transport>) -> Self {
        let greeting = spec.greeting_turn();
        let actor = Actor {
            transcript: Transcript::new(greeting),
            generation: spec.generation.clone(),
            spec,
            transport,
            input_text: String::new(),
            phase: Phase::Idle,
            error: None,
            seq: 0,
        };

        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(actor.snapshot());
        let task = tokio::spawn(actor.run(intent_rx, state_tx));

        Self {
            intents: intent_tx,
            state: state_rx,
            task,
        }
    }

    /// Submits an intent. Intents are processed strictly in order.
    pub fn accept(&self, intent: Intent) {
        if self.intents.send(intent).is_err() {
            warn!("intent dropped: controller actor is gone");
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> ChatState {
        self.state.borrow().clone()
    }

    /// A receiver for observing every published state change.
    pub fn watch(&self) -> watch::Receiver<ChatState> {
        self.state.clone()
    }

    /// Waits until the controller has published past `seq` and is not in
    /// the middle of a round trip, then returns the settled snapshot.
    ///
    /// Every handled intent publishes at least one snapshot, including
    /// ignored ones, so waiting on a no-op still resolves.
    pub async fn settled_after(&self, seq: u64) -> Result<ChatState, ConfabError> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|s| s.seq > seq && !s.is_busy())
            .await
            .map_err(|_| ConfabError::Internal("controller actor stopped".into()))?;
        Ok(state.clone())
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The actor owning all mutable conversation state.
struct Actor {
    spec: ConversationSpec,
    transport: Arc<dyn Transport>,
    transcript: Transcript,
    generation: GenerationConfig,
    input_text: String,
    phase: Phase,
    error: Option<String>,
    seq: u64,
}

impl Actor {
    async fn run(
        mut self,
        mut intents: mpsc::UnboundedReceiver<Intent>,
        state_tx: watch::Sender<ChatState>,
    ) {
        while let Some(intent) = intents.recv().await {
            self.handle(intent, &state_tx).await;
        }
        debug!("conversation actor stopped");
    }

    async fn handle(&mut self, intent: Intent, state_tx: &watch::Sender<ChatState>) {
        match intent {
            Intent::UpdateInputText(text) => {
                self.input_text = text;
                self.publish(state_tx);
            }
            Intent::UpdateTemperature(value) => {
                self.generation.set_temperature(value);
                debug!(temperature = self.generation.temperature, "temperature updated");
                self.publish(state_tx);
            }
            Intent::RestartConversation => {
                self.transcript.reset(self.spec.greeting_turn());
                self.input_text.clear();
                self.error = None;
                self.phase = Phase::Idle;
                self.publish(state_tx);
            }
            Intent::SendMessage(text) => {
                if self.phase == Phase::AwaitingResponse {
                    warn!("send ignored: a request is already in flight");
                    self.publish(state_tx);
                    return;
                }
                if text.trim().is_empty() {
                    self.publish(state_tx);
                    return;
                }
                self.transcript.push(Turn::user(text));
                self.input_text.clear();
                self.begin_round_trip(state_tx).await;
            }
            Intent::RetryLastMessage => {
                if self.phase == Phase::AwaitingResponse {
                    warn!("retry ignored: a request is already in flight");
                    self.publish(state_tx);
                    return;
                }
                // The prior user turn is re-sent through the existing
                // transcript; nothing is appended.
                if self.transcript.last_user_text().is_none() {
                    debug!("retry ignored: no user message yet");
                    self.publish(state_tx);
                    return;
                }
                self.begin_round_trip(state_tx).await;
            }
        }
    }

    /// Runs one request/response round trip against the current transcript.
    async fn begin_round_trip(&mut self, state_tx: &watch::Sender<ChatState>) {
        self.error = None;
        self.phase = Phase::AwaitingResponse;
        self.publish(state_tx);

        match self.round_trip().await {
            Ok(turn) => {
                self.transcript.push(turn);
                self.phase = Phase::Idle;
            }
            Err(err) => {
                let message = surface_message(&err);
                warn!(error = %err, "round trip failed");
                self.transcript
                    .push(Turn::assistant_error(format!("Error: {message}")));
                self.error = Some(message);
                self.phase = Phase::Error;
            }
        }
        self.publish(state_tx);
    }

    async fn round_trip(&self) -> Result<Turn, ConfabError> {
        let request = build_request(&self.transcript, &self.generation, &self.spec.system_prompt);
        let body = serde_json::to_value(&request)
            .map_err(|e| ConfabError::Internal(format!("request serialization failed: {e}")))?;
        let raw = self.transport.post_json(body).await?;
        decode::decode_body(&raw.body)
    }

    fn publish(&mut self, state_tx: &watch::Sender<ChatState>) {
        self.seq += 1;
        let _ = state_tx.send(self.snapshot());
    }

    fn snapshot(&self) -> ChatState {
        ChatState {
            input_text: self.input_text.clone(),
            turns: self.transcript.turns().to_vec(),
            phase: self.phase,
            error: self.error.clone(),
            temperature: self.generation.temperature,
            seq: self.seq,
        }
    }
}

/// User-facing message for a failed round trip: the provider's own text for
/// envelope errors, the transport description otherwise.
fn surface_message(err: &ConfabError) -> String {
    match err {
        ConfabError::Envelope { message } => message.clone(),
        ConfabError::Transport { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use confab_core::{RawResponse, Role};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted transport: pops one canned result per call and records every
    /// request body it was given.
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<RawResponse, ConfabError>>>,
        requests: Mutex<Vec<serde_json::Value>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<RawResponse, ConfabError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn ok_body(body: serde_json::Value) -> Result<RawResponse, ConfabError> {
            Ok(RawResponse {
                status: 200,
                body: body.to_string(),
            })
        }

        fn envelope_with_content(content: &str) -> Result<RawResponse, ConfabError> {
            Self::ok_body(json!({
                "choices": [{"message": {"content": content, "role": "assistant"}}],
                "usage": {"completion_tokens": 1, "prompt_tokens": 1, "total_tokens": 2}
            }))
        }

        fn requests(&self) -> Vec<serde_json::Value> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post_json(&self, body: serde_json::Value) -> Result<RawResponse, ConfabError> {
            self.requests.lock().unwrap().push(body);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ConfabError::transport("no scripted response left")))
        }
    }

    fn test_spec() -> ConversationSpec {
        ConversationSpec {
            system_prompt: "You are a consultant.".into(),
            greeting_json: r#"{"message":"Welcome!"}"#.into(),
            fallback_greeting: "Welcome!".into(),
            generation: GenerationConfig::default(),
        }
    }

    async fn send_and_settle(controller: &ChatController, text: &str) -> ChatState {
        let seq = controller.state().seq;
        controller.accept(Intent::SendMessage(text.into()));
        controller.settled_after(seq).await.unwrap()
    }

    #[tokio::test]
    async fn initial_state_carries_decoded_greeting() {
        let transport = ScriptedTransport::new(vec![]);
        let controller = ChatController::spawn(test_spec(), transport);

        let state = controller.state();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.turns.len(), 1);
        assert_eq!(state.turns[0].role, Role::Assistant);
        assert_eq!(state.turns[0].text, "Welcome!");
        assert!(!state.turns[0].is_decode_error);
    }

    #[tokio::test]
    async fn malformed_greeting_falls_back_to_plain_text() {
        let spec = ConversationSpec {
            greeting_json: "not json".into(),
            fallback_greeting: "Hello there".into(),
            ..test_spec()
        };
        let controller = ChatController::spawn(spec, ScriptedTransport::new(vec![]));

        let state = controller.state();
        assert_eq!(state.turns[0].text, "Hello there");
        assert!(state.turns[0].raw_payload.is_none());
    }

    #[tokio::test]
    async fn send_message_appends_user_and_decoded_assistant_turn() {
        let content = r#"{"message":"Hi","options":[{"title":"A","pros":["fast"],"cons":[]}]}"#;
        let transport =
            ScriptedTransport::new(vec![ScriptedTransport::envelope_with_content(content)]);
        let controller = ChatController::spawn(test_spec(), transport.clone());

        let state = send_and_settle(&controller, "help me pick").await;

        assert_eq!(state.phase, Phase::Idle);
        assert!(state.error.is_none());
        assert_eq!(state.turns.len(), 3);
        assert_eq!(state.turns[1].role, Role::User);
        assert_eq!(state.turns[2].text, "Hi");
        assert_eq!(state.turns[2].options.as_ref().unwrap().len(), 1);

        // Greeting exclusion: the outbound request starts with the system
        // prompt and the user message only.
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let messages = requests[0]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "help me pick");
    }

    #[tokio::test]
    async fn provider_error_envelope_surfaces_exact_message() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::ok_body(json!({
            "error": {"message": "rate limited", "type": "rate_limit"}
        }))]);
        let controller = ChatController::spawn(test_spec(), transport);

        let state = send_and_settle(&controller, "hello").await;

        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.error.as_deref(), Some("rate limited"));
        // A synthetic assistant turn carries the error inline.
        let last = state.turns.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.text.contains("rate limited"));
    }

    #[tokio::test]
    async fn transport_error_keeps_conversation_usable() {
        let content = r#"{"message":"recovered"}"#;
        let transport = ScriptedTransport::new(vec![
            Err(ConfabError::transport("connection refused")),
            ScriptedTransport::envelope_with_content(content),
        ]);
        let controller = ChatController::spawn(test_spec(), transport);

        let state = send_and_settle(&controller, "first").await;
        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.error.as_deref(), Some("connection refused"));

        // Error is not sticky: the next send proceeds and clears it.
        let state = send_and_settle(&controller, "second").await;
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.error.is_none());
        assert_eq!(state.turns.last().unwrap().text, "recovered");
    }

    #[tokio::test]
    async fn retry_resends_without_duplicating_user_turn() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::envelope_with_content("not json at all"),
            ScriptedTransport::envelope_with_content(r#"{"message":"better"}"#),
        ]);
        let controller = ChatController::spawn(test_spec(), transport.clone());

        let state = send_and_settle(&controller, "question").await;
        assert!(state.turns.last().unwrap().is_decode_error);

        let seq = state.seq;
        controller.accept(Intent::RetryLastMessage);
        let state = controller.settled_after(seq).await.unwrap();

        // One user turn, not two.
        let user_turns = state.turns.iter().filter(|t| t.role == Role::User).count();
        assert_eq!(user_turns, 1);
        assert_eq!(state.turns.last().unwrap().text, "better");

        // The retried request repeats the original user text.
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        let messages = requests[1]["messages"].as_array().unwrap();
        assert_eq!(messages[1]["content"], "question");
    }

    #[tokio::test]
    async fn retry_without_user_message_is_a_no_op() {
        let transport = ScriptedTransport::new(vec![]);
        let controller = ChatController::spawn(test_spec(), transport.clone());

        let seq = controller.state().seq;
        controller.accept(Intent::RetryLastMessage);
        let state = controller.settled_after(seq).await.unwrap();

        assert_eq!(state.turns.len(), 1);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn waiting_on_an_ignored_retry_settles_promptly() {
        let controller = ChatController::spawn(test_spec(), ScriptedTransport::new(vec![]));

        // The REPL dispatch path awaits settled state after every intent;
        // an ignored retry must still produce a snapshot to wait on.
        let seq = controller.state().seq;
        controller.accept(Intent::RetryLastMessage);
        let settled = tokio::time::timeout(
            std::time::Duration::from_millis(500),
            controller.settled_after(seq),
        )
        .await;

        let state = settled.expect("ignored retry must publish").unwrap();
        assert_eq!(state.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn decode_error_turn_echoes_raw_content_as_history() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::envelope_with_content("plain prose reply"),
            ScriptedTransport::envelope_with_content(r#"{"message":"ok"}"#),
        ]);
        let controller = ChatController::spawn(test_spec(), transport.clone());

        send_and_settle(&controller, "first").await;
        send_and_settle(&controller, "second").await;

        // The raw fallback turn is re-sent verbatim in history.
        let requests = transport.requests();
        let messages = requests[1]["messages"].as_array().unwrap();
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[2]["content"], "plain prose reply");
    }

    #[tokio::test]
    async fn update_temperature_applies_to_next_request() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::envelope_with_content(
            r#"{"message":"ok"}"#,
        )]);
        let controller = ChatController::spawn(test_spec(), transport.clone());

        let seq = controller.state().seq;
        controller.accept(Intent::UpdateTemperature(0.9));
        let state = controller.settled_after(seq).await.unwrap();
        assert_eq!(state.temperature, 0.9);

        send_and_settle(&controller, "hi").await;
        assert_eq!(transport.requests()[0]["temperature"], 0.9);
    }

    #[tokio::test]
    async fn update_temperature_clamps_out_of_range() {
        let controller = ChatController::spawn(test_spec(), ScriptedTransport::new(vec![]));

        let seq = controller.state().seq;
        controller.accept(Intent::UpdateTemperature(5.0));
        let state = controller.settled_after(seq).await.unwrap();
        assert_eq!(state.temperature, 1.0);
    }

    #[tokio::test]
    async fn restart_resets_transcript_to_greeting() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::envelope_with_content(
            r#"{"message":"ok"}"#,
        )]);
        let controller = ChatController::spawn(test_spec(), transport);

        let state = send_and_settle(&controller, "hello").await;
        assert_eq!(state.turns.len(), 3);

        let seq = state.seq;
        controller.accept(Intent::RestartConversation);
        let state = controller.settled_after(seq).await.unwrap();

        assert_eq!(state.turns.len(), 1);
        assert_eq!(state.turns[0].text, "Welcome!");
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn blank_send_is_ignored() {
        let transport = ScriptedTransport::new(vec![]);
        let controller = ChatController::spawn(test_spec(), transport.clone());

        let seq = controller.state().seq;
        controller.accept(Intent::SendMessage("   ".into()));
        controller.settled_after(seq).await.unwrap();

        assert!(transport.requests().is_empty());
        assert_eq!(controller.state().turns.len(), 1);
    }

    #[tokio::test]
    async fn queued_sends_are_processed_in_order_without_interleaving() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::envelope_with_content(r#"{"message":"one"}"#),
            ScriptedTransport::envelope_with_content(r#"{"message":"two"}"#),
        ]);
        let controller = ChatController::spawn(test_spec(), transport.clone());

        let seq = controller.state().seq;
        controller.accept(Intent::SendMessage("a".into()));
        controller.accept(Intent::SendMessage("b".into()));

        let mut rx = controller.watch();
        let state = rx
            .wait_for(|s| s.seq > seq && !s.is_busy() && s.turns.len() == 5)
            .await
            .unwrap()
            .clone();

        let texts: Vec<_> = state.turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Welcome!", "a", "one", "b", "two"]);

        // The second request saw the first round trip's result in history.
        let requests = transport.requests();
        let messages = requests[1]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
    }

    #[tokio::test]
    async fn phase_display_names() {
        assert_eq!(Phase::Idle.to_string(), "idle");
        assert_eq!(Phase::AwaitingResponse.to_string(), "awaiting-response");
        assert_eq!(Phase::Error.to_string(), "error");
    }
}
