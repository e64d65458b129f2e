//! crates/snooze_core/src/stories.rs
//!
//! Operations on the shared story list: fetching the feed, submitting a
//! new story, and removing one of the caller's own stories.

use crate::domain::{Session, Story, StoryDraft, StoryList};
use crate::ports::{BackendError, BackendResult, StoryBackend};

impl Story {
    /// Fetches one story by id from the service. Requires no
    /// authentication; an unknown id is `NotFound`.
    pub async fn fetch_by_id(backend: &dyn StoryBackend, story_id: &str) -> BackendResult<Story> {
        if story_id.trim().is_empty() {
            return Err(BackendError::Validation(
                "story id must not be empty".to_string(),
            ));
        }
        backend.fetch_story(story_id).await
    }
}

impl StoryList {
    /// Fetches every story the service knows about.
    ///
    /// Requires no authentication. The returned list preserves the
    /// service's ordering exactly.
    pub async fn fetch_all(backend: &dyn StoryBackend) -> BackendResult<StoryList> {
        let stories = backend.fetch_stories().await?;
        Ok(StoryList { stories })
    }

    /// Submits a new story on behalf of `session`, then prepends the
    /// service's copy of it to this list and to the session's own stories.
    /// Returns the new story.
    ///
    /// All draft fields must be non-empty; a payload the service itself
    /// rejects also comes back as `Validation`.
    pub async fn add_story(
        &mut self,
        backend: &dyn StoryBackend,
        session: &mut Session,
        draft: StoryDraft,
    ) -> BackendResult<Story> {
        if draft.title.trim().is_empty()
            || draft.author.trim().is_empty()
            || draft.url.trim().is_empty()
        {
            return Err(BackendError::Validation(
                "title, author and url are all required".to_string(),
            ));
        }

        let story = backend.create_story(&session.token, &draft).await?;
        self.stories.insert(0, story.clone());
        session.own_stories.insert(0, story.clone());
        Ok(story)
    }

    /// Deletes one of the session's own stories from the service and drops
    /// it from both this list and the session's own stories.
    ///
    /// An id that is not in the list at all is `NotFound` before any
    /// request is sent.
    pub async fn remove_story(
        &mut self,
        backend: &dyn StoryBackend,
        session: &mut Session,
        story_id: &str,
    ) -> BackendResult<()> {
        if !self.stories.iter().any(|s| s.story_id == story_id) {
            return Err(BackendError::NotFound(format!("story {story_id}")));
        }

        backend.delete_story(&session.token, story_id).await?;
        self.stories.retain(|s| s.story_id != story_id);
        session.own_stories.retain(|s| s.story_id != story_id);
        Ok(())
    }
}
