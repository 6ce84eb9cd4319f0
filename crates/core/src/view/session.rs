use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::debug;

use super::controller::ViewController;
use crate::debounce::{DebounceState, Debouncer};

/// One interactive page: a view controller fed by debounced input.
///
/// Starting a session loads the trending list and fetches movies for the
/// initial (empty) query. After that every settled change of the input
/// triggers one catalog fetch on its own task, so fetches can overlap; the
/// controller keeps only the newest result. Dropping the session aborts
/// every task it started, including fetches still in flight.
pub struct SearchSession {
    controller: Arc<ViewController>,
    debouncer: Debouncer<String>,
    tasks: Vec<JoinHandle<()>>,
}

impl SearchSession {
    /// Mount the page and start reacting to input.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(controller: Arc<ViewController>, debounce: Duration) -> Self {
        let debouncer = Debouncer::new(String::new(), debounce);

        let mount = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.mount().await }
        });
        let driver = tokio::spawn(drive(Arc::clone(&controller), debouncer.subscribe()));

        Self {
            controller,
            debouncer,
            tasks: vec![mount, driver],
        }
    }

    /// Handle a keystroke: show the text immediately, search it once settled.
    pub async fn input(&self, text: &str) {
        self.controller.set_search_term(text).await;
        self.debouncer.push(text.to_string());
    }

    pub fn controller(&self) -> &Arc<ViewController> {
        &self.controller
    }

    pub fn debounce_state(&self) -> DebounceState {
        self.debouncer.state()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Fetch for every settled value.
///
/// Fetches live in a `JoinSet` owned by this future, so aborting the driver
/// aborts them too.
async fn drive(controller: Arc<ViewController>, mut settled: watch::Receiver<String>) {
    let mut fetches = JoinSet::new();

    loop {
        let query = settled.borrow_and_update().clone();
        debug!("Settled search term: '{}'", query);

        // Reap finished fetches
        while fetches.try_join_next().is_some() {}

        let controller = Arc::clone(&controller);
        fetches.spawn(async move {
            controller.fetch_movies(&query).await;
        });

        if settled.changed().await.is_err() {
            break;
        }
    }
}
