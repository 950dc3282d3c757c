//! Waiting indicator shown until the first piece of a reply arrives

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use streamchat_application::AssemblyObserver;
use streamchat_domain::StreamError;

/// Wraps an observer with a spinner that disappears on the first callback.
pub struct WaitingIndicator<O> {
    inner: O,
    spinner: Mutex<Option<ProgressBar>>,
}

impl<O: AssemblyObserver> WaitingIndicator<O> {
    /// Start the spinner (when `show` is set) with `message` next to it.
    pub fn new(inner: O, show: bool, message: &str) -> Self {
        let spinner = show.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        });

        Self {
            inner,
            spinner: Mutex::new(spinner),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    #[cfg(test)]
    fn is_waiting(&self) -> bool {
        self.spinner.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Remove the spinner; safe to call more than once.
    pub fn dismiss(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl<O: AssemblyObserver> AssemblyObserver for WaitingIndicator<O> {
    fn on_update(&self, snapshot: &str) {
        self.dismiss();
        self.inner.on_update(snapshot);
    }

    fn on_complete(&self) {
        self.dismiss();
        self.inner.on_complete();
    }

    fn on_error(&self, partial: &str, error: &StreamError) {
        self.dismiss();
        self.inner.on_error(partial, error);
    }
}

impl<O> Drop for WaitingIndicator<O> {
    fn drop(&mut self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamchat_application::{AssemblyUpdate, ChannelObserver, drain_updates};

    #[test]
    fn test_forwards_callbacks_in_order() {
        let (observer, mut rx) = ChannelObserver::new();
        let indicator = WaitingIndicator::new(observer, false, "waiting");
        indicator.on_update("a");
        indicator.on_complete();

        assert_eq!(
            drain_updates(&mut rx),
            vec![AssemblyUpdate::Update("a".to_string()), AssemblyUpdate::Complete]
        );
    }

    #[test]
    fn test_spinner_clears_on_first_callback() {
        let (observer, _rx) = ChannelObserver::new();
        let indicator = WaitingIndicator::new(observer, true, "waiting");
        assert!(indicator.is_waiting());

        indicator.on_error("", &StreamError::NoResponseBody);
        assert!(!indicator.is_waiting());
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let indicator = WaitingIndicator::new(streamchat_application::NoObserver, true, "x");
        indicator.dismiss();
        indicator.dismiss();
        assert!(!indicator.is_waiting());
    }
}
