//! Send Message use case.
//!
//! One chat turn: append the user's message to the [`Conversation`], open a
//! completion stream, assemble the reply through a [`ResponseAssembler`] and
//! record whatever text the user saw as the assistant's turn.

use crate::config::ChatParams;
use crate::ports::assembly_observer::AssemblyObserver;
use crate::ports::completion_transport::CompletionTransport;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::use_cases::assemble_response::{AssemblyOutcome, ResponseAssembler};
use std::sync::Arc;
use streamchat_domain::{ChatRequest, Conversation, DomainError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that prevent a turn from starting.
///
/// Stream failures are not errors here; they end up in
/// [`AssemblyOutcome::Failed`].
#[derive(Error, Debug)]
pub enum SendMessageError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Use case for sending one message and streaming the reply.
#[derive(Clone)]
pub struct SendMessageUseCase {
    transport: Arc<dyn CompletionTransport>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl SendMessageUseCase {
    pub fn new(transport: Arc<dyn CompletionTransport>) -> Self {
        Self {
            transport,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Run one turn.
    ///
    /// Cancelling `cancellation` while connecting or streaming ends the turn
    /// with [`AssemblyOutcome::Cancelled`]; text already shown is kept in the
    /// conversation.
    pub async fn execute(
        &self,
        conversation: &mut Conversation,
        content: &str,
        params: &ChatParams,
        observer: &dyn AssemblyObserver,
        cancellation: CancellationToken,
    ) -> Result<AssemblyOutcome, SendMessageError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyMessage.into());
        }

        conversation.push_user(content);
        self.conversation_logger.log(ConversationEvent::new(
            "user_message",
            serde_json::json!({
                "model": params.model,
                "text": content,
                "turn": conversation.len(),
            }),
        ));

        let request = ChatRequest::streaming(
            &params.model,
            params.system_prompt.as_deref(),
            conversation,
        )
        .with_temperature(params.temperature)
        .with_max_tokens(params.max_tokens);

        info!(
            "Sending message to {} ({} messages in request)",
            params.model,
            request.messages.len()
        );

        let assembler = ResponseAssembler::new(params.flush);

        let opened = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Cancelled while connecting");
                let outcome = AssemblyOutcome::Cancelled(String::new());
                self.record(conversation, &outcome, params);
                return Ok(outcome);
            }
            opened = self.transport.open_stream(&request, cancellation.clone()) => opened,
        };

        let outcome = match opened {
            Ok(handle) => assembler.run(handle, observer, &cancellation).await,
            Err(error) => {
                warn!("Failed to open stream: {}", error);
                assembler.reject(error, observer)
            }
        };

        self.record(conversation, &outcome, params);
        Ok(outcome)
    }

    fn record(&self, conversation: &mut Conversation, outcome: &AssemblyOutcome, params: &ChatParams) {
        let text = outcome.text();
        if !text.is_empty() {
            conversation.push_assistant(text);
        }

        let event = match outcome {
            AssemblyOutcome::Completed(text) => ConversationEvent::new(
                "assistant_response",
                serde_json::json!({
                    "model": params.model,
                    "text": text,
                    "chars": text.chars().count(),
                }),
            ),
            AssemblyOutcome::Failed { partial, error } => ConversationEvent::new(
                "stream_failed",
                serde_json::json!({
                    "model": params.model,
                    "kind": error.kind().as_str(),
                    "error": error.to_string(),
                    "partial": partial,
                }),
            ),
            AssemblyOutcome::Cancelled(partial) => ConversationEvent::new(
                "stream_cancelled",
                serde_json::json!({
                    "model": params.model,
                    "partial": partial,
                }),
            ),
        };
        self.conversation_logger.log(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::assembly_observer::{AssemblyUpdate, ChannelObserver, NoObserver, drain_updates};
    use crate::ports::completion_transport::StreamHandle;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use streamchat_domain::{Role, StreamError, StreamEvent};

    /// Transport that replays canned events and remembers each request.
    struct FakeTransport {
        result: Result<Vec<StreamEvent>, StreamError>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl FakeTransport {
        fn replying(events: Vec<StreamEvent>) -> Self {
            Self {
                result: Ok(events),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: StreamError) -> Self {
            Self {
                result: Err(error),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionTransport for FakeTransport {
        async fn open_stream(
            &self,
            request: &ChatRequest,
            _cancellation: CancellationToken,
        ) -> Result<StreamHandle, StreamError> {
            self.requests.lock().unwrap().push(request.clone());
            self.result.clone().map(StreamHandle::from_events)
        }
    }

    /// Logger that keeps event types in memory.
    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    fn reply(words: &[&str]) -> Vec<StreamEvent> {
        let mut events: Vec<StreamEvent> = words.iter().map(|w| StreamEvent::fragment(*w)).collect();
        events.push(StreamEvent::Done);
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_turn_is_recorded() {
        let transport = Arc::new(FakeTransport::replying(reply(&["Hello", " there"])));
        let logger = Arc::new(RecordingLogger::default());
        let use_case = SendMessageUseCase::new(transport.clone())
            .with_conversation_logger(logger.clone());
        let (observer, mut rx) = ChannelObserver::new();
        let mut conversation = Conversation::new();

        let outcome = use_case
            .execute(
                &mut conversation,
                "  hi  ",
                &ChatParams::default().with_system_prompt("Be kind."),
                &observer,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, AssemblyOutcome::Completed("Hello there".to_string()));
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.messages()[0].content, "hi");
        assert_eq!(conversation.last().unwrap().role, Role::Assistant);
        assert_eq!(drain_updates(&mut rx).last(), Some(&AssemblyUpdate::Complete));

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].stream);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert_eq!(
            *logger.events.lock().unwrap(),
            vec!["user_message", "assistant_response"]
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let transport = Arc::new(FakeTransport::replying(reply(&[])));
        let use_case = SendMessageUseCase::new(transport.clone());
        let mut conversation = Conversation::new();

        let result = use_case
            .execute(
                &mut conversation,
                "   ",
                &ChatParams::default(),
                &NoObserver,
                CancellationToken::new(),
            )
            .await;

        assert!(matches!(
            result,
            Err(SendMessageError::Domain(DomainError::EmptyMessage))
        ));
        assert!(conversation.is_empty());
        assert!(transport.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_reports_error_without_reply() {
        let error = StreamError::http_status(500, "boom");
        let transport = Arc::new(FakeTransport::failing(error.clone()));
        let logger = Arc::new(RecordingLogger::default());
        let use_case =
            SendMessageUseCase::new(transport).with_conversation_logger(logger.clone());
        let (observer, mut rx) = ChannelObserver::new();
        let mut conversation = Conversation::new();

        let outcome = use_case
            .execute(
                &mut conversation,
                "hi",
                &ChatParams::default(),
                &observer,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.error(), Some(&error));
        assert_eq!(
            drain_updates(&mut rx),
            vec![AssemblyUpdate::Error {
                partial: String::new(),
                error,
            }]
        );
        assert_eq!(conversation.len(), 1);
        assert_eq!(
            *logger.events.lock().unwrap(),
            vec!["user_message", "stream_failed"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_reply_is_kept_on_failure() {
        let transport = Arc::new(FakeTransport::replying(vec![
            StreamEvent::fragment("Half a"),
            StreamEvent::Error(StreamError::StreamRead("reset".to_string())),
        ]));
        let use_case = SendMessageUseCase::new(transport);
        let mut conversation = Conversation::new();

        let outcome = use_case
            .execute(
                &mut conversation,
                "tell me",
                &ChatParams::default(),
                &NoObserver,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.text(), "Half a");
        assert_eq!(conversation.last().unwrap().content, "Half a");
    }

    #[tokio::test]
    async fn test_cancelled_before_connect_skips_transport() {
        let transport = Arc::new(FakeTransport::replying(reply(&["never"])));
        let logger = Arc::new(RecordingLogger::default());
        let use_case = SendMessageUseCase::new(transport.clone())
            .with_conversation_logger(logger.clone());
        let token = CancellationToken::new();
        token.cancel();
        let mut conversation = Conversation::new();

        let outcome = use_case
            .execute(
                &mut conversation,
                "hi",
                &ChatParams::default(),
                &NoObserver,
                token,
            )
            .await
            .unwrap();

        assert_eq!(outcome, AssemblyOutcome::Cancelled(String::new()));
        assert!(transport.requests.lock().unwrap().is_empty());
        assert_eq!(conversation.len(), 1);
        assert_eq!(
            *logger.events.lock().unwrap(),
            vec!["user_message", "stream_cancelled"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_grows_across_turns() {
        let transport = Arc::new(FakeTransport::replying(reply(&["ok"])));
        let use_case = SendMessageUseCase::new(transport.clone());
        let mut conversation = Conversation::new();
        let params = ChatParams::default();

        for input in ["first", "second"] {
            use_case
                .execute(
                    &mut conversation,
                    input,
                    &params,
                    &NoObserver,
                    CancellationToken::new(),
                )
                .await
                .unwrap();
        }

        assert_eq!(conversation.len(), 4);
        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[1].messages.len(), 3);
    }
}
