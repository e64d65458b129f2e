//! Model tests for stories, the story list, and the session lifecycle.
//!
//! Everything runs against an in-memory fake of the remote story service,
//! so the tests exercise the model code exactly as written without
//! depending on live data from the real API.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use snooze_core::domain::{Session, Story, StoryDraft, StoryList, UserSnapshot};
use snooze_core::ports::{BackendError, BackendResult, StoryBackend};
use snooze_core::session::{FavoriteError, FavoriteOutcome, SignupError};
use std::collections::HashMap;
use std::sync::Mutex;

//=========================================================================================
// Fixtures
//=========================================================================================

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

fn story(id: &str, title: &str, url: &str, username: &str) -> Story {
    Story {
        story_id: id.to_string(),
        title: title.to_string(),
        author: "Test Author".to_string(),
        url: url.to_string(),
        username: username.to_string(),
        created_at: fixed_time(),
        updated_at: None,
    }
}

fn draft(title: &str, author: &str, url: &str) -> StoryDraft {
    StoryDraft {
        title: title.to_string(),
        author: author.to_string(),
        url: url.to_string(),
    }
}

//=========================================================================================
// An in-memory fake of the remote story service
//=========================================================================================

struct FakeAccount {
    password: String,
    name: String,
    token: String,
    favorite_ids: Vec<String>,
    own_ids: Vec<String>,
}

struct FakeState {
    // Newest first, like the live service's feed.
    stories: Vec<Story>,
    accounts: HashMap<String, FakeAccount>,
    next_id: u64,
}

struct FakeService {
    state: Mutex<FakeState>,
    /// When false, the favorite endpoints answer with a user document that
    /// does not reflect the requested change, simulating a service that
    /// never confirms it.
    confirm_favorites: bool,
}

impl FakeService {
    fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                stories: Vec::new(),
                accounts: HashMap::new(),
                next_id: 1,
            }),
            confirm_favorites: true,
        }
    }

    fn without_favorite_confirmation() -> Self {
        let mut service = Self::new();
        service.confirm_favorites = false;
        service
    }

    /// Seeds an account the way the live service would hold one, and
    /// returns the token it would hand out at login.
    fn register(&self, username: &str, password: &str, name: &str) -> String {
        let token = format!("{username}-token");
        let mut state = self.state.lock().unwrap();
        state.accounts.insert(
            username.to_string(),
            FakeAccount {
                password: password.to_string(),
                name: name.to_string(),
                token: token.clone(),
                favorite_ids: Vec::new(),
                own_ids: Vec::new(),
            },
        );
        token
    }

    fn seed_story(&self, story: Story) {
        self.state.lock().unwrap().stories.insert(0, story);
    }
}

fn snapshot_of(state: &FakeState, username: &str) -> UserSnapshot {
    let account = &state.accounts[username];
    let pick = |ids: &[String]| -> Vec<Story> {
        ids.iter()
            .filter_map(|id| state.stories.iter().find(|s| &s.story_id == id))
            .cloned()
            .collect()
    };
    UserSnapshot {
        username: username.to_string(),
        name: account.name.clone(),
        created_at: fixed_time(),
        favorites: pick(&account.favorite_ids),
        stories: pick(&account.own_ids),
    }
}

fn username_for_token(state: &FakeState, token: &str) -> BackendResult<String> {
    state
        .accounts
        .iter()
        .find(|(_, account)| account.token == token)
        .map(|(username, _)| username.clone())
        .ok_or_else(|| BackendError::Auth("invalid token".to_string()))
}

#[async_trait]
impl StoryBackend for FakeService {
    async fn fetch_stories(&self) -> BackendResult<Vec<Story>> {
        Ok(self.state.lock().unwrap().stories.clone())
    }

    async fn fetch_story(&self, story_id: &str) -> BackendResult<Story> {
        self.state
            .lock()
            .unwrap()
            .stories
            .iter()
            .find(|s| s.story_id == story_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("story {story_id}")))
    }

    async fn create_story(&self, token: &str, draft: &StoryDraft) -> BackendResult<Story> {
        let mut state = self.state.lock().unwrap();
        let username = username_for_token(&state, token)?;
        let id = state.next_id.to_string();
        state.next_id += 1;
        let created = Story {
            story_id: id.clone(),
            title: draft.title.clone(),
            author: draft.author.clone(),
            url: draft.url.clone(),
            username: username.clone(),
            created_at: fixed_time(),
            updated_at: None,
        };
        state.stories.insert(0, created.clone());
        state.accounts.get_mut(&username).unwrap().own_ids.insert(0, id);
        Ok(created)
    }

    async fn delete_story(&self, token: &str, story_id: &str) -> BackendResult<()> {
        let mut state = self.state.lock().unwrap();
        let username = username_for_token(&state, token)?;
        if !state.stories.iter().any(|s| s.story_id == story_id) {
            return Err(BackendError::NotFound(format!("story {story_id}")));
        }
        state.stories.retain(|s| s.story_id != story_id);
        state
            .accounts
            .get_mut(&username)
            .unwrap()
            .own_ids
            .retain(|id| id != story_id);
        Ok(())
    }

    async fn signup(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> BackendResult<(UserSnapshot, String)> {
        {
            let state = self.state.lock().unwrap();
            if state.accounts.contains_key(username) {
                return Err(BackendError::Validation(format!(
                    "username {username} is already taken"
                )));
            }
        }
        let token = self.register(username, password, name);
        let state = self.state.lock().unwrap();
        Ok((snapshot_of(&state, username), token))
    }

    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> BackendResult<(UserSnapshot, String)> {
        let state = self.state.lock().unwrap();
        match state.accounts.get(username) {
            Some(account) if account.password == password => {
                Ok((snapshot_of(&state, username), account.token.clone()))
            }
            _ => Err(BackendError::Auth("invalid username or password".to_string())),
        }
    }

    async fn fetch_user(&self, username: &str, token: &str) -> BackendResult<UserSnapshot> {
        let state = self.state.lock().unwrap();
        match state.accounts.get(username) {
            Some(account) if account.token == token => Ok(snapshot_of(&state, username)),
            Some(_) => Err(BackendError::Auth("invalid token".to_string())),
            None => Err(BackendError::NotFound(format!("user {username}"))),
        }
    }

    async fn add_favorite(
        &self,
        token: &str,
        username: &str,
        story_id: &str,
    ) -> BackendResult<UserSnapshot> {
        let mut state = self.state.lock().unwrap();
        username_for_token(&state, token)?;
        if self.confirm_favorites {
            let account = state.accounts.get_mut(username).unwrap();
            if !account.favorite_ids.iter().any(|id| id == story_id) {
                account.favorite_ids.push(story_id.to_string());
            }
        }
        Ok(snapshot_of(&state, username))
    }

    async fn remove_favorite(
        &self,
        token: &str,
        username: &str,
        story_id: &str,
    ) -> BackendResult<UserSnapshot> {
        let mut state = self.state.lock().unwrap();
        username_for_token(&state, token)?;
        if self.confirm_favorites {
            let account = state.accounts.get_mut(username).unwrap();
            account.favorite_ids.retain(|id| id != story_id);
        }
        Ok(snapshot_of(&state, username))
    }
}

//=========================================================================================
// Story
//=========================================================================================

#[test]
fn story_fields_round_trip() {
    let story = story("1", "Test Story", "https://test-story.com/", "testUser");
    assert_eq!(story.story_id, "1");
    assert_eq!(story.title, "Test Story");
    assert_eq!(story.author, "Test Author");
    assert_eq!(story.url, "https://test-story.com/");
    assert_eq!(story.username, "testUser");
    assert_eq!(story.created_at, fixed_time());
    assert_eq!(story.updated_at, None);
}

#[tokio::test]
async fn fetch_story_by_id() {
    let service = FakeService::new();
    service.seed_story(story("1", "Test Story", "https://test-story.com/", "testUser"));

    let fetched = Story::fetch_by_id(&service, "1").await.unwrap();
    assert_eq!(fetched.title, "Test Story");

    let missing = Story::fetch_by_id(&service, "999").await;
    assert!(matches!(missing, Err(BackendError::NotFound(_))));

    let empty = Story::fetch_by_id(&service, "").await;
    assert!(matches!(empty, Err(BackendError::Validation(_))));
}

//=========================================================================================
// StoryList
//=========================================================================================

#[tokio::test]
async fn fetch_all_preserves_service_order() {
    let service = FakeService::new();
    service.seed_story(story("1", "Older", "https://one.com/", "a"));
    service.seed_story(story("2", "Newer", "https://two.com/", "b"));

    let list = StoryList::fetch_all(&service).await.unwrap();
    let ids: Vec<&str> = list.stories.iter().map(|s| s.story_id.as_str()).collect();
    assert_eq!(ids, ["2", "1"]);
}

#[tokio::test]
async fn add_story_prepends_to_list_and_own_stories() {
    let service = FakeService::new();
    service.seed_story(story("1", "Existing", "https://old.com/", "someoneElse"));
    service.register("testUser", "password", "Test User");

    let mut session = Session::login(&service, "testUser", "password").await.unwrap();
    let mut list = StoryList::fetch_all(&service).await.unwrap();
    let before = list.stories.len();

    let first = list
        .add_story(&service, &mut session, draft("T1", "A1", "https://one.com/"))
        .await
        .unwrap();
    let second = list
        .add_story(&service, &mut session, draft("T2", "A2", "https://two.com/"))
        .await
        .unwrap();

    assert_eq!(list.stories.len(), before + 2);
    // Most recent submission first.
    assert_eq!(list.stories[0], second);
    assert_eq!(list.stories[1], first);
    assert_eq!(session.own_stories, vec![second, first]);
}

#[tokio::test]
async fn add_story_rejects_empty_fields_locally() {
    let service = FakeService::new();
    service.register("testUser", "password", "Test User");

    let mut session = Session::login(&service, "testUser", "password").await.unwrap();
    let mut list = StoryList::fetch_all(&service).await.unwrap();

    let result = list
        .add_story(&service, &mut session, draft("", "A", "https://x.com/"))
        .await;
    assert!(matches!(result, Err(BackendError::Validation(_))));
    assert!(list.stories.is_empty());
    assert!(session.own_stories.is_empty());
}

#[tokio::test]
async fn remove_story_drops_from_both_containers() {
    let service = FakeService::new();
    service.register("testUser", "password", "Test User");

    let mut session = Session::login(&service, "testUser", "password").await.unwrap();
    let mut list = StoryList::fetch_all(&service).await.unwrap();
    let added = list
        .add_story(&service, &mut session, draft("T", "A", "https://x.com/"))
        .await
        .unwrap();

    list.remove_story(&service, &mut session, &added.story_id)
        .await
        .unwrap();
    assert!(list.stories.is_empty());
    assert!(session.own_stories.is_empty());
}

#[tokio::test]
async fn remove_story_with_unknown_id_is_not_found() {
    let service = FakeService::new();
    service.register("testUser", "password", "Test User");

    let mut session = Session::login(&service, "testUser", "password").await.unwrap();
    let mut list = StoryList::fetch_all(&service).await.unwrap();

    let result = list.remove_story(&service, &mut session, "999").await;
    assert!(matches!(result, Err(BackendError::NotFound(_))));
}

//=========================================================================================
// Session: signup / login / restore
//=========================================================================================

#[tokio::test]
async fn signup_returns_a_fresh_session() {
    let service = FakeService::new();

    let session = Session::signup(&service, "newUser", "password", "New User")
        .await
        .unwrap();
    assert_eq!(session.username, "newUser");
    assert_eq!(session.name, "New User");
    assert!(session.favorites.is_empty());
    assert!(session.own_stories.is_empty());
    assert!(!session.token.is_empty());
}

#[tokio::test]
async fn signup_with_taken_username_is_rejected() {
    let service = FakeService::new();
    service.register("testUser", "password", "Test User");

    let result = Session::signup(&service, "testUser", "other", "Someone Else").await;
    assert!(matches!(result, Err(SignupError::Rejected(_))));
}

#[tokio::test]
async fn login_with_bad_password_is_an_auth_error() {
    let service = FakeService::new();
    service.register("testUser", "password", "Test User");

    let result = Session::login(&service, "testUser", "wrong").await;
    assert!(matches!(result, Err(BackendError::Auth(_))));
}

#[tokio::test]
async fn restore_with_rejected_token_returns_none() {
    let service = FakeService::new();
    service.register("testUser", "password", "Test User");

    let restored =
        Session::restore_from_stored_credentials(&service, "stale-token", "testUser")
            .await
            .unwrap();
    assert!(restored.is_none());

    let unknown =
        Session::restore_from_stored_credentials(&service, "any-token", "nobody")
            .await
            .unwrap();
    assert!(unknown.is_none());
}

#[tokio::test]
async fn restore_with_valid_token_revives_the_session() {
    let service = FakeService::new();
    let token = service.register("testUser", "password", "Test User");

    let restored = Session::restore_from_stored_credentials(&service, &token, "testUser")
        .await
        .unwrap()
        .expect("session should be restored");
    assert_eq!(restored.username, "testUser");
    assert_eq!(restored.token, token);
}

//=========================================================================================
// Session: favorites
//=========================================================================================

async fn logged_in_with_story(service: &FakeService) -> (Session, Story) {
    service.register("testUser", "password", "Test User");
    let mut session = Session::login(service, "testUser", "password").await.unwrap();
    let mut list = StoryList::fetch_all(service).await.unwrap();
    let story = list
        .add_story(service, &mut session, draft("T", "A", "https://x.com/"))
        .await
        .unwrap();
    (session, story)
}

#[tokio::test]
async fn add_favorite_is_idempotent() {
    let service = FakeService::new();
    let (mut session, story) = logged_in_with_story(&service).await;

    let first = session.add_favorite(&service, &story).await.unwrap();
    assert_eq!(first, FavoriteOutcome::Added);

    let second = session.add_favorite(&service, &story).await.unwrap();
    assert_eq!(second, FavoriteOutcome::AlreadyFavorite);

    let matching = session
        .favorites
        .iter()
        .filter(|s| s.story_id == story.story_id)
        .count();
    assert_eq!(matching, 1);
}

#[tokio::test]
async fn is_favorite_flips_after_add() {
    let service = FakeService::new();
    let (mut session, story) = logged_in_with_story(&service).await;

    assert!(!session.is_favorite(&story));
    session.add_favorite(&service, &story).await.unwrap();
    assert!(session.is_favorite(&story));
}

#[tokio::test]
async fn add_then_remove_favorite_is_a_round_trip() {
    let service = FakeService::new();
    let (mut session, story) = logged_in_with_story(&service).await;
    let before = session.favorites.clone();

    session.add_favorite(&service, &story).await.unwrap();
    let removed = session.remove_favorite(&service, &story).await.unwrap();
    assert_eq!(removed, FavoriteOutcome::Removed);
    assert_eq!(session.favorites, before);

    // Removing a story that is not a favorite sends nothing and succeeds.
    let again = session.remove_favorite(&service, &story).await.unwrap();
    assert_eq!(again, FavoriteOutcome::NotFavorite);
}

#[tokio::test]
async fn unconfirmed_favorite_change_is_an_explicit_error() {
    let service = FakeService::without_favorite_confirmation();
    let (mut session, story) = logged_in_with_story(&service).await;

    let result = session.add_favorite(&service, &story).await;
    match result {
        Err(FavoriteError::Unconfirmed(id)) => assert_eq!(id, story.story_id),
        other => panic!("expected Unconfirmed, got {other:?}"),
    }
    // Local state untouched.
    assert!(!session.is_favorite(&story));
}

//=========================================================================================
// End to end
//=========================================================================================

#[tokio::test]
async fn login_then_submit_end_to_end() {
    let service = FakeService::new();
    service.register("testUser", "password", "Test User");

    let mut session = Session::login(&service, "testUser", "password").await.unwrap();
    assert!(session.own_stories.is_empty());
    assert!(session.favorites.is_empty());

    let mut list = StoryList::fetch_all(&service).await.unwrap();
    let story = list
        .add_story(&service, &mut session, draft("T", "A", "http://x.com"))
        .await
        .unwrap();

    assert_eq!(list.stories.first(), Some(&story));
    assert_eq!(session.own_stories, vec![story]);
}
