//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, which is the concrete implementation
//! of the `StoryBackend` port from the `core` crate. It speaks the hosted
//! story service's REST API with `reqwest`; all wire-format structs and
//! status-code mapping live here, so the core never sees JSON or HTTP.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snooze_core::domain::{Story, StoryDraft, UserSnapshot};
use snooze_core::ports::{BackendError, BackendResult, StoryBackend};
use url::Url;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `StoryBackend` port over HTTPS + JSON.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base: String,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` rooted at the service's base URL.
    pub fn new(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }
}

//=========================================================================================
// Wire-format Structs
//=========================================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryRecord {
    story_id: String,
    title: String,
    author: String,
    url: String,
    username: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl StoryRecord {
    fn to_domain(self) -> Story {
        Story {
            story_id: self.story_id,
            title: self.title,
            author: self.author,
            url: self.url,
            username: self.username,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    username: String,
    #[serde(default)]
    name: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    favorites: Vec<StoryRecord>,
    // The service calls the user's own submissions "stories".
    #[serde(default)]
    stories: Vec<StoryRecord>,
}

impl UserRecord {
    fn to_domain(self) -> UserSnapshot {
        UserSnapshot {
            username: self.username,
            name: self.name,
            created_at: self.created_at,
            favorites: self.favorites.into_iter().map(StoryRecord::to_domain).collect(),
            stories: self.stories.into_iter().map(StoryRecord::to_domain).collect(),
        }
    }
}

#[derive(Deserialize)]
struct StoriesResponse {
    stories: Vec<StoryRecord>,
}

#[derive(Deserialize)]
struct StoryResponse {
    story: StoryRecord,
}

#[derive(Deserialize)]
struct AuthResponse {
    user: UserRecord,
    token: String,
}

#[derive(Deserialize)]
struct UserResponse {
    user: UserRecord,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct FavoriteResponse {
    message: String,
    user: UserRecord,
}

#[derive(Serialize)]
struct CreateStoryRequest<'a> {
    token: &'a str,
    story: StoryPayload<'a>,
}

#[derive(Serialize)]
struct StoryPayload<'a> {
    title: &'a str,
    author: &'a str,
    url: &'a str,
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    user: UserPayload<'a>,
}

#[derive(Serialize)]
struct UserPayload<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    token: &'a str,
}

//=========================================================================================
// Response Handling
//=========================================================================================

/// Maps a non-success status onto the port's error taxonomy.
fn error_for_status(status: StatusCode, body: String) -> BackendError {
    let reason = if body.trim().is_empty() {
        status.to_string()
    } else {
        body
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Auth(reason),
        StatusCode::NOT_FOUND => BackendError::NotFound(reason),
        status if status.is_client_error() => BackendError::Validation(reason),
        _ => BackendError::Network(reason),
    }
}

fn transport_error(e: reqwest::Error) -> BackendError {
    BackendError::Network(e.to_string())
}

/// Checks the status, then decodes the JSON body into the expected shape.
async fn parse_json<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_for_status(status, body));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Like `parse_json`, but for calls where only the status matters.
async fn expect_success(response: Response) -> BackendResult<()> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_for_status(status, body));
    }
    Ok(())
}

//=========================================================================================
// `StoryBackend` Trait Implementation
//=========================================================================================

#[async_trait]
impl StoryBackend for HttpBackend {
    async fn fetch_stories(&self) -> BackendResult<Vec<Story>> {
        let response = self
            .client
            .get(self.url("stories"))
            .send()
            .await
            .map_err(transport_error)?;
        let body: StoriesResponse = parse_json(response).await?;
        Ok(body.stories.into_iter().map(StoryRecord::to_domain).collect())
    }

    async fn fetch_story(&self, story_id: &str) -> BackendResult<Story> {
        let response = self
            .client
            .get(self.url(&format!("stories/{story_id}")))
            .send()
            .await
            .map_err(transport_error)?;
        let body: StoryResponse = parse_json(response).await?;
        Ok(body.story.to_domain())
    }

    async fn create_story(&self, token: &str, draft: &StoryDraft) -> BackendResult<Story> {
        // The service takes the token in the request body, not a header.
        let request = CreateStoryRequest {
            token,
            story: StoryPayload {
                title: &draft.title,
                author: &draft.author,
                url: &draft.url,
            },
        };
        let response = self
            .client
            .post(self.url("stories"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        let body: StoryResponse = parse_json(response).await?;
        Ok(body.story.to_domain())
    }

    async fn delete_story(&self, token: &str, story_id: &str) -> BackendResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("stories/{story_id}")))
            .json(&TokenRequest { token })
            .send()
            .await
            .map_err(transport_error)?;
        expect_success(response).await
    }

    async fn signup(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> BackendResult<(UserSnapshot, String)> {
        let request = CredentialsRequest {
            user: UserPayload {
                username,
                password,
                name: Some(name),
            },
        };
        let response = self
            .client
            .post(self.url("signup"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        let body: AuthResponse = parse_json(response).await?;
        Ok((body.user.to_domain(), body.token))
    }

    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> BackendResult<(UserSnapshot, String)> {
        let request = CredentialsRequest {
            user: UserPayload {
                username,
                password,
                name: None,
            },
        };
        let response = self
            .client
            .post(self.url("login"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        let body: AuthResponse = parse_json(response).await?;
        Ok((body.user.to_domain(), body.token))
    }

    async fn fetch_user(&self, username: &str, token: &str) -> BackendResult<UserSnapshot> {
        // Restore is the one call that carries the token in the query string.
        let response = self
            .client
            .get(self.url(&format!("users/{username}")))
            .query(&[("token", token)])
            .send()
            .await
            .map_err(transport_error)?;
        let body: UserResponse = parse_json(response).await?;
        Ok(body.user.to_domain())
    }

    async fn add_favorite(
        &self,
        token: &str,
        username: &str,
        story_id: &str,
    ) -> BackendResult<UserSnapshot> {
        let response = self
            .client
            .post(self.url(&format!("users/{username}/favorites/{story_id}")))
            .json(&TokenRequest { token })
            .send()
            .await
            .map_err(transport_error)?;
        let body: FavoriteResponse = parse_json(response).await?;
        Ok(body.user.to_domain())
    }

    async fn remove_favorite(
        &self,
        token: &str,
        username: &str,
        story_id: &str,
    ) -> BackendResult<UserSnapshot> {
        let response = self
            .client
            .delete(self.url(&format!("users/{username}/favorites/{story_id}")))
            .json(&TokenRequest { token })
            .send()
            .await
            .map_err(transport_error)?;
        let body: FavoriteResponse = parse_json(response).await?;
        Ok(body.user.to_domain())
    }
}

//=========================================================================================
// Tests
//=========================================================================================
