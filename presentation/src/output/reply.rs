//! One chat turn, rendered in the configured output format

use super::console::{ConsoleRenderer, cancelled_notice};
use super::transcript::TranscriptView;
use crate::config::OutputConfig;
use crate::progress::WaitingIndicator;
use colored::Colorize;
use streamchat_application::{
    AssemblyOutcome, ChatParams, SendMessageError, SendMessageUseCase,
};
use streamchat_domain::{Conversation, OutputFormat};
use tokio_util::sync::CancellationToken;
use tracing::warn;

const WAITING_MESSAGE: &str = "waiting for reply...";

/// Runs a turn through [`SendMessageUseCase`] and prints the reply.
pub struct ReplyPrinter {
    config: OutputConfig,
}

impl ReplyPrinter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub async fn send(
        &self,
        use_case: &SendMessageUseCase,
        conversation: &mut Conversation,
        input: &str,
        params: &ChatParams,
        cancellation: CancellationToken,
    ) -> Result<AssemblyOutcome, SendMessageError> {
        match self.config.format {
            OutputFormat::Stream => {
                let observer = WaitingIndicator::new(
                    ConsoleRenderer::stdout(),
                    self.config.show_progress,
                    WAITING_MESSAGE,
                );
                let outcome = use_case
                    .execute(conversation, input, params, &observer, cancellation)
                    .await?;
                observer.dismiss();

                if let AssemblyOutcome::Cancelled(_) = outcome {
                    if observer.inner().printed() > 0 {
                        println!();
                    }
                    eprintln!("{}", cancelled_notice());
                }
                Ok(outcome)
            }
            OutputFormat::Final => {
                let observer = WaitingIndicator::new(
                    TranscriptView::new(),
                    self.config.show_progress,
                    WAITING_MESSAGE,
                );
                let outcome = use_case
                    .execute(conversation, input, params, &observer, cancellation)
                    .await?;
                observer.dismiss();

                if !outcome.text().is_empty() {
                    println!("{}", outcome.text());
                }
                match &outcome {
                    AssemblyOutcome::Failed { error, .. } => {
                        eprintln!("{} {}", "Error:".red().bold(), error)
                    }
                    AssemblyOutcome::Cancelled(_) => eprintln!("{}", cancelled_notice()),
                    AssemblyOutcome::Completed(_) => {}
                }
                Ok(outcome)
            }
            OutputFormat::Json => {
                let view = TranscriptView::new();
                let outcome = use_case
                    .execute(conversation, input, params, &view, cancellation)
                    .await?;

                match serde_json::to_string_pretty(&view.summary(&outcome)) {
                    Ok(json) => println!("{}", json),
                    Err(e) => warn!("Failed to serialize reply summary: {}", e),
                }
                Ok(outcome)
            }
        }
    }
}
