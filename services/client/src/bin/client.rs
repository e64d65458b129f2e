//! services/client/src/bin/client.rs

use client_lib::{
    adapters::{CredentialStore, HttpBackend},
    app::{actions, AppState},
    config::Config,
    error::ClientError,
};
use snooze_core::domain::StoryDraft;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
commands:
  stories                         show the story feed
  login <username> <password>     log in
  signup <username> <password> <name...>
  submit <title> | <author> | <url>
  fav <story-id>                  toggle a favorite
  remove <story-id>               delete one of your stories
  favorites                       show your favorites
  mine                            show your submissions
  logout
  quit";

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Using service at {}", config.api_base_url);

    // --- 2. Build the Adapters ---
    let http = reqwest::Client::new();
    let backend = Arc::new(HttpBackend::new(http, config.api_base_url.clone()));
    let credentials = CredentialStore::new(config.credentials_path.clone());

    // --- 3. Start the App: restore session, fetch stories, first paint ---
    let mut state = AppState::new(backend, credentials);
    let first_view = actions::handle_startup(&mut state).await?;
    println!("{first_view}");
    println!("{HELP}");

    // --- 4. Event Loop: one line per UI event ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        match dispatch(&mut state, line).await {
            Ok(view) => println!("{view}"),
            // Inline error: show it next to the prompt and keep going.
            Err(e) => println!("error: {e}"),
        }
    }

    Ok(())
}

/// Routes one input line to the matching UI action.
async fn dispatch(state: &mut AppState, line: &str) -> Result<String, ClientError> {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "stories" => actions::handle_show_feed(state),
        "favorites" => actions::handle_show_favorites(state),
        "mine" => actions::handle_show_own_stories(state),
        "logout" => actions::handle_logout(state).await,
        "fav" => actions::handle_toggle_favorite(state, rest).await,
        "remove" => actions::handle_remove_story(state, rest).await,
        "login" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(username), Some(password)) => {
                    actions::handle_login(state, username, password).await
                }
                _ => Ok("usage: login <username> <password>".to_string()),
            }
        }
        "signup" => {
            let mut parts = rest.splitn(3, ' ');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(username), Some(password), Some(name)) if !name.trim().is_empty() => {
                    actions::handle_signup(state, username, password, name.trim()).await
                }
                _ => Ok("usage: signup <username> <password> <name...>".to_string()),
            }
        }
        "submit" => match parse_draft(rest) {
            Some(draft) => actions::handle_submit_story(state, draft).await,
            None => Ok("usage: submit <title> | <author> | <url>".to_string()),
        },
        "help" => Ok(HELP.to_string()),
        other => Ok(format!("unknown command {other:?} (try 'help')")),
    }
}

/// Parses the submit form's three fields from a `title | author | url` line.
fn parse_draft(input: &str) -> Option<StoryDraft> {
    let mut parts = input.splitn(3, '|').map(str::trim);
    let (title, author, url) = (parts.next()?, parts.next()?, parts.next()?);
    Some(StoryDraft {
        title: title.to_string(),
        author: author.to_string(),
        url: url.to_string(),
    })
}
