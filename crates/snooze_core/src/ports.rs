//! crates/snooze_core/src/ports.rs
//!
//! Defines the service contract (trait) for the remote story service.
//! This trait forms the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete HTTP transport behind it.

use crate::domain::{Story, StoryDraft, UserSnapshot};
use async_trait::async_trait;

//=========================================================================================
// Backend Error and Result Types
//=========================================================================================

/// Errors reported at the remote-service boundary.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure: connection refused, timeout, DNS, TLS.
    #[error("network failure: {0}")]
    Network(String),
    /// A response arrived but its body was not the documented shape.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The service rejected the credentials or token (HTTP 401/403).
    #[error("credentials rejected: {0}")]
    Auth(String),
    /// The service rejected the submitted field values.
    #[error("request rejected: {0}")]
    Validation(String),
    /// The referenced id does not exist on the service.
    #[error("not found: {0}")]
    NotFound(String),
}

/// A convenience type alias for `Result<T, BackendError>`.
pub type BackendResult<T> = Result<T, BackendError>;

//=========================================================================================
// Service Port (Trait)
//=========================================================================================

/// The hosted story-sharing service, seen as a black box.
///
/// Every call that changes a user's server-side record hands back the fresh
/// `UserSnapshot` from the response, so callers can confirm the change
/// actually took effect instead of assuming it did.
#[async_trait]
pub trait StoryBackend: Send + Sync {
    // --- Stories ---
    async fn fetch_stories(&self) -> BackendResult<Vec<Story>>;

    async fn fetch_story(&self, story_id: &str) -> BackendResult<Story>;

    async fn create_story(&self, token: &str, draft: &StoryDraft) -> BackendResult<Story>;

    async fn delete_story(&self, token: &str, story_id: &str) -> BackendResult<()>;

    // --- Accounts ---
    async fn signup(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> BackendResult<(UserSnapshot, String)>;

    async fn login(&self, username: &str, password: &str)
        -> BackendResult<(UserSnapshot, String)>;

    /// Credential-validated fetch of a user record, used to revive a
    /// remembered session at startup.
    async fn fetch_user(&self, username: &str, token: &str) -> BackendResult<UserSnapshot>;

    // --- Favorites ---
    async fn add_favorite(
        &self,
        token: &str,
        username: &str,
        story_id: &str,
    ) -> BackendResult<UserSnapshot>;

    async fn remove_favorite(
        &self,
        token: &str,
        username: &str,
        story_id: &str,
    ) -> BackendResult<UserSnapshot>;
}
