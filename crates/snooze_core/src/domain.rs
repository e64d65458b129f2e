//! crates/snooze_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Utc};
use url::Url;

/// Error raised when a story's URL cannot be parsed as an absolute URL.
#[derive(Debug, thiserror::Error)]
#[error("invalid story url {url:?}: {reason}")]
pub struct InvalidUrlError {
    pub url: String,
    pub reason: String,
}

/// One submitted story, exactly as the service reported it.
///
/// A `Story` is an immutable snapshot: `story_id` is assigned by the service
/// and there is no local edit path. Stories only leave memory by being
/// removed from a containing list.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub story_id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Story {
    /// Parses the hostname out of the story's URL and returns it.
    ///
    /// `https://foo.com/bar` => `foo.com`
    /// `http://www.foo.com` => `www.foo.com`
    ///
    /// A URL that is not absolute, or has no host at all, is an error
    /// condition rather than a silent default.
    pub fn host_name(&self) -> Result<String, InvalidUrlError> {
        let parsed = Url::parse(&self.url).map_err(|e| InvalidUrlError {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        match parsed.host_str() {
            Some(host) => Ok(host.to_string()),
            None => Err(InvalidUrlError {
                url: self.url.clone(),
                reason: "no host component".to_string(),
            }),
        }
    }
}

/// The fields a visitor supplies when submitting a new story.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryDraft {
    pub title: String,
    pub author: String,
    pub url: String,
}

/// The service's view of one user: profile fields plus that user's
/// favorites and own submissions, as returned by signup, login, restore,
/// and the favorite endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSnapshot {
    pub username: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub favorites: Vec<Story>,
    pub stories: Vec<Story>,
}

/// The in-memory ordered collection of all known stories.
///
/// Order matches the service's return order on fetch; newly submitted
/// stories are prepended. The list is rebuilt every session, never
/// persisted locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryList {
    pub stories: Vec<Story>,
}

/// The authenticated identity of the current visitor.
///
/// Holds the opaque login token required for every mutating request, plus
/// independent copies of the user's favorites and own submissions (copies,
/// not aliases into the shared story list). There is no anonymous
/// `Session`: one exists only after a successful signup, login, or
/// credential restore, and is dropped on logout.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub favorites: Vec<Story>,
    pub own_stories: Vec<Story>,
    pub token: String,
}

impl Session {
    /// Builds a session from the user document the service returned at
    /// signup/login/restore time, attaching the login token.
    pub fn from_snapshot(snapshot: UserSnapshot, token: String) -> Self {
        Self {
            username: snapshot.username,
            name: snapshot.name,
            created_at: snapshot.created_at,
            favorites: snapshot.favorites,
            own_stories: snapshot.stories,
            token,
        }
    }
}
