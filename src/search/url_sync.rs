use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};

use super::SearchFilterState;

/// Receives the canonical query string once the shopper stops typing.
pub trait NavigationSink: Send + Sync + 'static {
    fn replace_query(&self, query: &str);
}

/// Trailing-edge debouncer that rewrites the shareable search URL.
///
/// Every `schedule` restarts the timer; only the last state inside the
/// window is committed. Unchanged query strings are not committed twice.
pub struct UrlSync {
    tx: mpsc::UnboundedSender<SearchFilterState>,
    task: JoinHandle<()>,
}

impl UrlSync {
    pub fn spawn(delay: Duration, sink: Arc<dyn NavigationSink>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(rx, delay, sink));
        Self { tx, task }
    }

    pub fn schedule(&self, state: SearchFilterState) {
        if self.tx.send(state).is_err() {
            tracing::warn!("url sync task is gone");
        }
    }

    /// Commit whatever is still pending and stop.
    pub async fn flush(self) {
        drop(self.tx);
        if let Err(err) = self.task.await {
            tracing::warn!(error = %err, "url sync task failed");
        }
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<SearchFilterState>,
    delay: Duration,
    sink: Arc<dyn NavigationSink>,
) {
    let mut last_committed: Option<String> = None;
    let mut commit = |state: &SearchFilterState| {
        let query = state.to_query_string();
        if last_committed.as_deref() != Some(query.as_str()) {
            sink.replace_query(&query);
            last_committed = Some(query);
        }
    };

    let mut pending: Option<SearchFilterState> = None;
    loop {
        match pending.take() {
            None => match rx.recv().await {
                Some(state) => pending = Some(state),
                None => break,
            },
            Some(state) => {
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        None => {
                            commit(&state);
                            break;
                        }
                    },
                    _ = tokio::time::sleep(delay) => commit(&state),
                }
            }
        }
    }
}
