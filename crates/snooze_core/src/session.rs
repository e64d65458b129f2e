//! crates/snooze_core/src/session.rs
//!
//! The account lifecycle: signup, login, restore-from-stored-credentials,
//! and favorite bookkeeping. A `Session` is always passed explicitly to the
//! operations that need it; there is no ambient current user.

use crate::domain::{Session, Story};
use crate::ports::{BackendError, BackendResult, StoryBackend};

//=========================================================================================
// Session-specific Error and Outcome Types
//=========================================================================================

/// Why a signup attempt did not produce a session.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    /// The service rejected the registration: duplicate username, field
    /// validation, and similar. Carries the service's stated reason.
    #[error("signup rejected: {0}")]
    Rejected(String),
    /// Anything that went wrong below the registration itself.
    #[error(transparent)]
    Backend(BackendError),
}

/// Why a favorite/unfavorite attempt did not change local state.
#[derive(Debug, thiserror::Error)]
pub enum FavoriteError {
    /// The service answered, but its user document does not reflect the
    /// requested change. Local favorites were left untouched; the caller
    /// decides whether to retry or report.
    #[error("service did not confirm the favorite change for story {0}")]
    Unconfirmed(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// What a favorite/unfavorite call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    /// The story was favorited on the service and appended locally.
    Added,
    /// The story was already a favorite; no request was sent.
    AlreadyFavorite,
    /// The story was unfavorited on the service and removed locally.
    Removed,
    /// The story was not a favorite; no request was sent.
    NotFavorite,
}

//=========================================================================================
// Session Operations
//=========================================================================================

impl Session {
    /// Registers a new account and returns the fresh session for it, with
    /// empty favorites and own stories.
    pub async fn signup(
        backend: &dyn StoryBackend,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<Session, SignupError> {
        if username.trim().is_empty() || password.is_empty() || name.trim().is_empty() {
            return Err(SignupError::Rejected(
                "username, password and name are all required".to_string(),
            ));
        }

        match backend.signup(username, password, name).await {
            Ok((snapshot, token)) => Ok(Session::from_snapshot(snapshot, token)),
            // The service folds duplicate usernames and bad field values
            // into its 4xx rejections; both read as "signup rejected" here.
            Err(BackendError::Validation(reason)) | Err(BackendError::Auth(reason)) => {
                Err(SignupError::Rejected(reason))
            }
            Err(other) => Err(SignupError::Backend(other)),
        }
    }

    /// Logs in an existing account. Invalid credentials surface as
    /// `BackendError::Auth`; success carries the service's current
    /// favorites and own-stories snapshot.
    pub async fn login(
        backend: &dyn StoryBackend,
        username: &str,
        password: &str,
    ) -> BackendResult<Session> {
        let (snapshot, token) = backend.login(username, password).await?;
        Ok(Session::from_snapshot(snapshot, token))
    }

    /// Attempts to revive a remembered session from a stored token and
    /// username, once at startup.
    ///
    /// A rejected pair is the normal outcome of an expired or revoked
    /// session on a fresh visit, so it comes back as `Ok(None)` rather
    /// than an error. Transport and decode failures still propagate.
    pub async fn restore_from_stored_credentials(
        backend: &dyn StoryBackend,
        token: &str,
        username: &str,
    ) -> BackendResult<Option<Session>> {
        match backend.fetch_user(username, token).await {
            Ok(snapshot) => Ok(Some(Session::from_snapshot(snapshot, token.to_string()))),
            Err(BackendError::Auth(_)) | Err(BackendError::NotFound(_)) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// Marks `story` as a favorite.
    ///
    /// Idempotent: a story already in the favorites sends no request at
    /// all. Otherwise the change only lands locally once the user document
    /// the service returns actually shows it; an answer that does not is
    /// an explicit `Unconfirmed` error, never a silent no-op.
    pub async fn add_favorite(
        &mut self,
        backend: &dyn StoryBackend,
        story: &Story,
    ) -> Result<FavoriteOutcome, FavoriteError> {
        if self.is_favorite(story) {
            return Ok(FavoriteOutcome::AlreadyFavorite);
        }

        let snapshot = backend
            .add_favorite(&self.token, &self.username, &story.story_id)
            .await?;

        if snapshot
            .favorites
            .iter()
            .any(|s| s.story_id == story.story_id)
        {
            self.favorites.push(story.clone());
            Ok(FavoriteOutcome::Added)
        } else {
            Err(FavoriteError::Unconfirmed(story.story_id.clone()))
        }
    }

    /// Unmarks `story` as a favorite. Symmetric with [`Session::add_favorite`]:
    /// only acts if the story is currently a favorite, and only removes the
    /// local entry once the returned user document no longer lists it.
    pub async fn remove_favorite(
        &mut self,
        backend: &dyn StoryBackend,
        story: &Story,
    ) -> Result<FavoriteOutcome, FavoriteError> {
        if !self.is_favorite(story) {
            return Ok(FavoriteOutcome::NotFavorite);
        }

        let snapshot = backend
            .remove_favorite(&self.token, &self.username, &story.story_id)
            .await?;

        if snapshot
            .favorites
            .iter()
            .any(|s| s.story_id == story.story_id)
        {
            Err(FavoriteError::Unconfirmed(story.story_id.clone()))
        } else {
            self.favorites.retain(|s| s.story_id != story.story_id);
            Ok(FavoriteOutcome::Removed)
        }
    }

    /// Pure membership test against the favorites, by story id.
    pub fn is_favorite(&self, story: &Story) -> bool {
        self.favorites.iter().any(|s| s.story_id == story.story_id)
    }
}
