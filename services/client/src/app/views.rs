//! services/client/src/app/views.rs
//!
//! Pure view renderers. Each returns the complete text of one view so the
//! shell can repaint it wholesale after a mutation; none of them touch the
//! terminal, which keeps them testable without one.

use snooze_core::domain::{InvalidUrlError, Session, Story, StoryList};

/// Renders one story line: favorite marker (only when a user is logged
/// in), title, hostname, author, and submitter.
pub fn render_story(story: &Story, session: Option<&Session>) -> Result<String, InvalidUrlError> {
    let host = story.host_name()?;
    let marker = match session {
        Some(session) if session.is_favorite(story) => "[*] ",
        Some(_) => "[ ] ",
        None => "",
    };
    Ok(format!(
        "{marker}{} ({host})\n    by {} | posted by {} | id {}",
        story.title, story.author, story.username, story.story_id
    ))
}

fn render_story_lines<'a>(
    stories: impl Iterator<Item = &'a Story>,
    session: Option<&Session>,
) -> Result<String, InvalidUrlError> {
    let mut lines = Vec::new();
    for story in stories {
        lines.push(render_story(story, session)?);
    }
    if lines.is_empty() {
        lines.push("  (no stories)".to_string());
    }
    Ok(lines.join("\n"))
}

/// The shared story feed.
pub fn render_feed(list: &StoryList, session: Option<&Session>) -> Result<String, InvalidUrlError> {
    render_story_lines(list.stories.iter(), session)
}

/// The logged-in user's favorites.
pub fn render_favorites(session: &Session) -> Result<String, InvalidUrlError> {
    render_story_lines(session.favorites.iter(), Some(session))
}

/// The logged-in user's own submissions.
pub fn render_own_stories(session: &Session) -> Result<String, InvalidUrlError> {
    render_story_lines(session.own_stories.iter(), Some(session))
}

/// The nav line: who is logged in, or the login prompt.
pub fn render_nav(session: Option<&Session>) -> String {
    match session {
        Some(session) => format!("=== snooze | logged in as {} ===", session.username),
        None => "=== snooze | not logged in ===".to_string(),
    }
}
