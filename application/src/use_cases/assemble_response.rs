//! Response assembler.
//!
//! Turns the decoded event sequence of one completion stream into paced,
//! batched updates for an [`AssemblyObserver`].
//!
//! Flush triggers:
//!
//! | Trigger | When | Paced |
//! |---------|------|-------|
//! | threshold | pending buffer reaches `threshold_chars` | yes (`delay`) |
//! | stop boundary | a fragment carries the stop finish reason | no |
//! | terminal | `Done` or `Error` arrives | no |
//!
//! At a stop boundary the text buffered *before* the stop fragment is
//! surfaced first, then the stop fragment's own text in a second update.
//! Neither waits for `Done`.

use crate::ports::assembly_observer::AssemblyObserver;
use crate::ports::completion_transport::StreamHandle;
use streamchat_domain::{Assembly, AssemblyState, FlushPolicy, Fragment, StreamError, StreamEvent};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// How an Assembly ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyOutcome {
    /// The stream finished normally with this text.
    Completed(String),
    /// The stream failed; `partial` is what had been surfaced.
    Failed { partial: String, error: StreamError },
    /// The caller cancelled; the text is what had been surfaced.
    Cancelled(String),
}

impl AssemblyOutcome {
    /// The text the user has seen.
    pub fn text(&self) -> &str {
        match self {
            AssemblyOutcome::Completed(text) | AssemblyOutcome::Cancelled(text) => text,
            AssemblyOutcome::Failed { partial, .. } => partial,
        }
    }

    pub fn state(&self) -> AssemblyState {
        match self {
            AssemblyOutcome::Completed(_) => AssemblyState::Completed,
            AssemblyOutcome::Failed { .. } => AssemblyState::Failed,
            AssemblyOutcome::Cancelled(_) => AssemblyState::Cancelled,
        }
    }

    pub fn error(&self) -> Option<&StreamError> {
        match self {
            AssemblyOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AssemblyOutcome::Completed(_))
    }
}

/// Batches fragments into observer updates.
///
/// Stateless between runs: every [`run`](Self::run) owns a fresh
/// [`Assembly`], so one assembler can serve any number of sequential or
/// concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseAssembler {
    policy: FlushPolicy,
}

impl ResponseAssembler {
    pub fn new(policy: FlushPolicy) -> Self {
        Self { policy }
    }

    /// Assemble one stream to its end.
    ///
    /// Cancellation is honoured while waiting for the next event and after
    /// each pacing delay (the delay itself is not interrupted). Once
    /// cancelled, no further callbacks fire.
    pub async fn run(
        &self,
        mut handle: StreamHandle,
        observer: &dyn AssemblyObserver,
        cancellation: &CancellationToken,
    ) -> AssemblyOutcome {
        let mut assembly = Assembly::new();

        loop {
            let event = tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Self::cancel(assembly),
                event = handle.recv() => event,
            };

            match event {
                Some(StreamEvent::Fragment(fragment)) => {
                    if !self
                        .on_fragment(&mut assembly, fragment, observer, cancellation)
                        .await
                    {
                        return Self::cancel(assembly);
                    }
                }
                Some(StreamEvent::Done) => return Self::complete(assembly, observer),
                Some(StreamEvent::Error(error)) => return Self::fail(assembly, error, observer),
                None => {
                    if cancellation.is_cancelled() {
                        return Self::cancel(assembly);
                    }
                    let error =
                        StreamError::StreamRead("stream closed before completion".to_string());
                    return Self::fail(assembly, error, observer);
                }
            }
        }
    }

    /// Fail an Assembly whose stream never opened.
    pub fn reject(&self, error: StreamError, observer: &dyn AssemblyObserver) -> AssemblyOutcome {
        Self::fail(Assembly::new(), error, observer)
    }

    /// Returns false when cancellation was observed after a pacing delay.
    async fn on_fragment(
        &self,
        assembly: &mut Assembly,
        fragment: Fragment,
        observer: &dyn AssemblyObserver,
        cancellation: &CancellationToken,
    ) -> bool {
        trace!(
            "Fragment: {} chars (stop: {})",
            fragment.text().chars().count(),
            fragment.is_stop()
        );

        if fragment.is_stop()
            && let Some(snapshot) = assembly.flush()
        {
            debug!("Stop boundary flush ({} bytes)", snapshot.len());
            observer.on_update(&snapshot);
        }

        if let Err(e) = assembly.push(fragment.text()) {
            warn!("Dropping fragment: {}", e);
            return true;
        }

        if fragment.is_stop() {
            if let Some(snapshot) = assembly.flush() {
                debug!("Stop record flush ({} bytes)", snapshot.len());
                observer.on_update(&snapshot);
            }
            return true;
        }

        if self.policy.is_reached(assembly.pending_chars()) {
            let delay = self.policy.delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if cancellation.is_cancelled() {
                return false;
            }
            if let Some(snapshot) = assembly.flush() {
                trace!("Threshold flush ({} bytes)", snapshot.len());
                observer.on_update(&snapshot);
            }
        }

        true
    }

    fn complete(mut assembly: Assembly, observer: &dyn AssemblyObserver) -> AssemblyOutcome {
        match assembly.complete() {
            Ok(Some(snapshot)) => observer.on_update(&snapshot),
            Ok(None) => {}
            Err(e) => warn!("Completing assembly: {}", e),
        }
        debug!(
            "Assembly completed ({} bytes)",
            assembly.full_text().len()
        );
        observer.on_complete();
        AssemblyOutcome::Completed(assembly.into_text())
    }

    fn fail(
        mut assembly: Assembly,
        error: StreamError,
        observer: &dyn AssemblyObserver,
    ) -> AssemblyOutcome {
        match assembly.fail() {
            Ok(Some(snapshot)) => observer.on_update(&snapshot),
            Ok(None) => {}
            Err(e) => warn!("Failing assembly: {}", e),
        }
        warn!(
            "Assembly failed after {} bytes: {}",
            assembly.full_text().len(),
            error
        );
        observer.on_error(assembly.full_text(), &error);
        AssemblyOutcome::Failed {
            partial: assembly.into_text(),
            error,
        }
    }

    fn cancel(mut assembly: Assembly) -> AssemblyOutcome {
        if let Err(e) = assembly.cancel() {
            warn!("Cancelling assembly: {}", e);
        }
        debug!(
            "Assembly cancelled ({} bytes kept)",
            assembly.full_text().len()
        );
        AssemblyOutcome::Cancelled(assembly.into_text())
    }
}
