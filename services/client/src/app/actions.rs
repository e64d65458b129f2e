//! services/client/src/app/actions.rs
//!
//! UI event handlers. Each one translates a user action into core calls
//! and hands back the full text of the affected view, so the shell can
//! repaint it after every mutation. Handlers never print; the shell
//! decides how to show output and how to surface inline errors.

use crate::app::state::AppState;
use crate::app::views;
use crate::adapters::StoredCredentials;
use crate::error::ClientError;
use snooze_core::domain::{Session, StoryDraft, StoryList};
use snooze_core::ports::BackendError;
use tracing::{error, info};

fn not_logged_in() -> ClientError {
    ClientError::Backend(BackendError::Auth(
        "no active session; log in first".to_string(),
    ))
}

/// The home view: nav line plus the shared story feed.
fn render_home(state: &AppState) -> Result<String, ClientError> {
    let nav = views::render_nav(state.session.as_ref());
    let feed = views::render_feed(&state.stories, state.session.as_ref())?;
    Ok(format!("{nav}\n{feed}"))
}

/// Startup: restore any remembered session, then fetch and render the feed.
/// Called once, before the event loop begins.
pub async fn handle_startup(state: &mut AppState) -> Result<String, ClientError> {
    // 1. Check for remembered credentials and try to revive the session.
    if let Some(credentials) = state.credentials.load() {
        match Session::restore_from_stored_credentials(
            state.backend.as_ref(),
            &credentials.token,
            &credentials.username,
        )
        .await
        {
            Ok(Some(session)) => {
                info!("restored remembered session for {}", session.username);
                state.session = Some(session);
            }
            Ok(None) => {
                // Expired or revoked credentials are a normal fresh-visit
                // outcome; forget them so the next start skips the attempt.
                info!("stored credentials were rejected; starting logged out");
                state.credentials.clear()?;
            }
            Err(e) => {
                error!("could not restore remembered session: {e}");
            }
        }
    }

    // 2. Fetch the shared story list and paint the first view.
    state.stories = StoryList::fetch_all(state.backend.as_ref()).await?;
    render_home(state)
}

/// Login form submitted. On failure the error is returned for the shell
/// to show inline; state is unchanged.
pub async fn handle_login(
    state: &mut AppState,
    username: &str,
    password: &str,
) -> Result<String, ClientError> {
    // 1. Authenticate.
    let session = Session::login(state.backend.as_ref(), username, password).await?;

    // 2. Remember the credentials for the next visit.
    state.credentials.save(&StoredCredentials {
        token: session.token.clone(),
        username: session.username.clone(),
    })?;

    // 3. Install the session and repaint so favorite markers appear.
    info!("logged in as {}", session.username);
    state.session = Some(session);
    render_home(state)
}

/// Signup form submitted.
pub async fn handle_signup(
    state: &mut AppState,
    username: &str,
    password: &str,
    name: &str,
) -> Result<String, ClientError> {
    let session = Session::signup(state.backend.as_ref(), username, password, name).await?;

    state.credentials.save(&StoredCredentials {
        token: session.token.clone(),
        username: session.username.clone(),
    })?;

    info!("signed up as {}", session.username);
    state.session = Some(session);
    render_home(state)
}

/// Logout clicked: clear the durable credentials and the session together,
/// then reinitialize the view from the service, like a page reload.
pub async fn handle_logout(state: &mut AppState) -> Result<String, ClientError> {
    state.credentials.clear()?;
    state.session = None;
    info!("logged out");

    state.stories = StoryList::fetch_all(state.backend.as_ref()).await?;
    render_home(state)
}

/// Story submit form submitted.
pub async fn handle_submit_story(
    state: &mut AppState,
    draft: StoryDraft,
) -> Result<String, ClientError> {
    let AppState {
        backend,
        stories,
        session,
        ..
    } = state;
    let Some(session) = session.as_mut() else {
        return Err(not_logged_in());
    };

    let story = stories.add_story(backend.as_ref(), session, draft).await?;
    info!("submitted story {}", story.story_id);
    render_home(state)
}

/// Delete clicked on one of the user's own stories.
pub async fn handle_remove_story(
    state: &mut AppState,
    story_id: &str,
) -> Result<String, ClientError> {
    let AppState {
        backend,
        stories,
        session,
        ..
    } = state;
    let Some(session) = session.as_mut() else {
        return Err(not_logged_in());
    };

    stories
        .remove_story(backend.as_ref(), session, story_id)
        .await?;
    info!("removed story {story_id}");
    render_home(state)
}

/// Favorite star clicked: flip the story's favorite status.
pub async fn handle_toggle_favorite(
    state: &mut AppState,
    story_id: &str,
) -> Result<String, ClientError> {
    // 1. The story must be in the shared list.
    let story = state
        .stories
        .stories
        .iter()
        .find(|s| s.story_id == story_id)
        .cloned()
        .ok_or_else(|| {
            ClientError::Backend(BackendError::NotFound(format!("story {story_id}")))
        })?;

    let AppState {
        backend, session, ..
    } = state;
    let Some(session) = session.as_mut() else {
        return Err(not_logged_in());
    };

    // 2. Flip based on current membership.
    let result = if session.is_favorite(&story) {
        session.remove_favorite(backend.as_ref(), &story).await
    } else {
        session.add_favorite(backend.as_ref(), &story).await
    };
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("favorite change for story {story_id} was not applied: {e}");
            return Err(e.into());
        }
    };
    info!("favorite toggle for story {story_id}: {outcome:?}");

    // 3. Repaint so the marker changes.
    render_home(state)
}

/// Nav "all stories" clicked.
pub fn handle_show_feed(state: &AppState) -> Result<String, ClientError> {
    render_home(state)
}

/// Nav "favorites" clicked.
pub fn handle_show_favorites(state: &AppState) -> Result<String, ClientError> {
    let Some(session) = state.session.as_ref() else {
        return Err(not_logged_in());
    };
    Ok(format!(
        "{}\n--- favorites ---\n{}",
        views::render_nav(Some(session)),
        views::render_favorites(session)?
    ))
}

/// Nav "my stories" clicked.
pub fn handle_show_own_stories(state: &AppState) -> Result<String, ClientError> {
    let Some(session) = state.session.as_ref() else {
        return Err(not_logged_in());
    };
    Ok(format!(
        "{}\n--- my stories ---\n{}",
        views::render_nav(Some(session)),
        views::render_own_stories(session)?
    ))
}
