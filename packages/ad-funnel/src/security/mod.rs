//! Secret handling for deployment credentials.

pub mod credentials;

pub use credentials::{ApiCredentials, SecretString, PLACEHOLDER_API_KEY};
