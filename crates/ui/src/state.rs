use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use services::FetchError;

/// What a view shows instead of its data when loading failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ViewError {
    /// No session; the view redirects to the login page.
    SignInRequired,
    /// Shown next to a retry button.
    Failed { message: String },
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ViewError::SignInRequired => "Please sign in to continue.",
            ViewError::Failed { message } => message,
        }
    }

    #[must_use]
    pub fn can_retry(&self) -> bool {
        matches!(self, ViewError::Failed { .. })
    }
}

impl From<FetchError> for ViewError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::AuthMissing => ViewError::SignInRequired,
            FetchError::Network(detail) => ViewError::Failed {
                message: format!("Could not reach the portal ({detail}). Please try again."),
            },
            FetchError::Application(message) => ViewError::Failed { message },
            other => ViewError::Failed {
                message: other.to_string(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&ViewError> {
        match self {
            ViewState::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[must_use]
pub fn view_state_from_result<T>(result: Result<T, FetchError>) -> ViewState<T> {
    match result {
        Ok(data) => ViewState::Ready(data),
        Err(err) => ViewState::Error(err.into()),
    }
}

/// Identifies one load started by [`Loadable::begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    state: ViewState<T>,
}

/// View state fed by async loads, where only the latest load may land.
///
/// Every [`begin`](Self::begin) or [`cancel`](Self::cancel) invalidates the tickets
/// handed out before it, so a slow response for a page the user already left is
/// dropped instead of overwriting newer state.
#[derive(Debug)]
pub struct Loadable<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for Loadable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                state: ViewState::Idle,
            })),
        }
    }
}

impl<T> Loadable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a load: the state becomes `Loading` and older tickets go stale.
    pub fn begin(&self) -> LoadTicket {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.state = ViewState::Loading;
        LoadTicket(slot.generation)
    }

    /// Apply a result if `ticket` is still current. Returns whether it was applied.
    pub fn apply(&self, ticket: LoadTicket, result: Result<T, FetchError>) -> bool {
        let mut slot = self.lock();
        if slot.generation != ticket.0 {
            return false;
        }
        slot.state = view_state_from_result(result);
        true
    }

    /// Drop whatever is in flight, e.g. when the view unmounts.
    pub fn cancel(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        if slot.state.is_loading() {
            slot.state = ViewState::Idle;
        }
    }

    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.lock().generation == ticket.0
    }

    /// Run `load` under a fresh ticket.
    pub async fn load<F>(&self, load: F) -> bool
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let ticket = self.begin();
        let result = load.await;
        self.apply(ticket, result)
    }
}

impl<T: Clone> Loadable<T> {
    #[must_use]
    pub fn snapshot(&self) -> ViewState<T> {
        self.lock().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_results_are_dropped() {
        let courses: Loadable<u32> = Loadable::new();
        let first = courses.begin();
        let second = courses.begin();

        assert!(courses.apply(second, Ok(2)));
        assert!(!courses.apply(first, Ok(1)));
        assert_eq!(courses.snapshot(), ViewState::Ready(2));
    }

    #[test]
    fn cancel_discards_the_load_in_flight() {
        let profile: Loadable<&str> = Loadable::new();
        let ticket = profile.begin();
        assert!(profile.snapshot().is_loading());

        profile.cancel();
        assert!(!profile.is_current(ticket));
        assert!(!profile.apply(ticket, Ok("late")));
        assert_eq!(profile.snapshot(), ViewState::Idle);
    }

    #[test]
    fn fetch_errors_map_to_view_errors() {
        let auth = ViewError::from(FetchError::AuthMissing);
        assert!(!auth.can_retry());

        let app = ViewError::from(FetchError::Application("Course closed".into()));
        assert_eq!(app.message(), "Course closed");
        assert!(app.can_retry());
    }

    #[tokio::test]
    async fn load_applies_the_latest_result() {
        let state: Loadable<Vec<u8>> = Loadable::new();
        assert!(state.load(async { Ok(vec![1, 2]) }).await);
        assert_eq!(state.snapshot().ready().map(Vec::len), Some(2));

        assert!(
            state
                .load(async { Err(FetchError::Network("timeout".into())) })
                .await
        );
        assert!(state.snapshot().error().is_some_and(ViewError::can_retry));
    }
}
