pub mod domain;
pub mod ports;
pub mod session;
pub mod stories;

pub use domain::{InvalidUrlError, Session, Story, StoryDraft, StoryList, UserSnapshot};
pub use ports::{BackendError, BackendResult, StoryBackend};
pub use session::{FavoriteError, FavoriteOutcome, SignupError};
