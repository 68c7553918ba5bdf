//! Credentials per security scheme and token acquisition

pub mod password_grant;
pub mod store;

pub use password_grant::{request_token, PasswordCredentials};
pub use store::{CredentialEntry, CredentialStore, TokenGrant};
