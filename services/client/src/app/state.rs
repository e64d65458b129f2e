//! services/client/src/app/state.rs
//!
//! Defines the application state shared by every UI action.

use crate::adapters::CredentialStore;
use snooze_core::domain::{Session, StoryList};
use snooze_core::ports::StoryBackend;
use std::sync::Arc;

/// Everything a UI event handler needs: the remote-service port, the
/// credential store, the shared story list, and the current session.
///
/// All mutation flows through `&mut AppState`, so one logical user action
/// finishes its fetch -> mutate -> re-render sequence before the next can
/// begin. That single-writer discipline is what stands in for request
/// sequence-stamping: responses from overlapping actions can never be
/// applied out of order because overlapping actions cannot exist.
pub struct AppState {
    pub backend: Arc<dyn StoryBackend>,
    pub credentials: CredentialStore,
    pub stories: StoryList,
    pub session: Option<Session>,
}

impl AppState {
    /// Creates a logged-out state with an empty story list.
    pub fn new(backend: Arc<dyn StoryBackend>, credentials: CredentialStore) -> Self {
        Self {
            backend,
            credentials,
            stories: StoryList::default(),
            session: None,
        }
    }
}
