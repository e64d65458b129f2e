pub mod credentials;
pub mod http;

pub use credentials::{CredentialStore, StoredCredentials};
pub use http::HttpBackend;
