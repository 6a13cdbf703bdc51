//! Agency Hub: multi-tenant agency and sub-account management.
//!
//! Agencies own sub-accounts and a team of users; users see sub-accounts
//! through permission grants; invitations turn into team members on their
//! first sign-in. Creating an agency or sub-account seeds its navigation
//! (and, for sub-accounts, a pipeline and a grant) in the same transaction.

pub mod access;
pub mod commands;
pub mod db;
pub mod defaults;
pub mod error;
pub mod identity;
mod migrations;
pub mod services;
pub mod state;
pub mod types;
pub mod validation;

pub use error::{ActionResponse, ServiceError};
pub use state::AppState;

/// Install the `env_logger` backend for the `log` macros.
///
/// Defaults to `info`; `RUST_LOG` overrides. Later calls are no-ops.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_logging_is_repeatable() {
        super::init_logging();
        super::init_logging();
        log::info!("logging initialized twice without panicking");
    }
}
