#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Configuration and startup credentials.

pub mod credentials;
mod error;
mod schema;

pub use credentials::{
    Credential, CredentialResolver, CredentialSource, EnvSource, SecretsFileSource, load_dotenv,
};
pub use error::{ConfigError, Result};
pub use schema::{Config, CredentialsConfig, DEFAULT_MODEL, ModelConfig};
