//! Login state commands.
//!
//! # Usage
//!
//! ```bash
//! # Save the catalog service's auth response, then log in with it
//! curl -s https://dummyjson.com/auth/login \
//!     -H 'Content-Type: application/json' \
//!     -d '{"username":"emilys","password":"emilyspass"}' > user.json
//! tinycart login user.json
//!
//! tinycart whoami
//! tinycart logout
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tinycart_core::User;
use tinycart_storefront::{StorageError, StorefrontConfig};
use tracing::info;

use super::{open_session, print_json};

/// Errors that can occur while changing login state.
#[derive(Debug, Error)]
pub enum SessionCommandError {
    /// The user file could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user file is not a valid user profile.
    #[error("Invalid user JSON in {path}: {source}")]
    InvalidUser {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The user profile carries an empty token.
    #[error("User in {0} has an empty token")]
    MissingToken(PathBuf),

    /// The storage directory could not be opened.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Output could not be written.
    #[error(transparent)]
    Output(#[from] serde_json::Error),
}

/// Load a user profile from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a user profile, or
/// carries an empty token.
pub fn read_user(path: &Path) -> Result<User, SessionCommandError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SessionCommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let user: User =
        serde_json::from_str(&raw).map_err(|source| SessionCommandError::InvalidUser {
            path: path.to_path_buf(),
            source,
        })?;
    if user.token.is_empty() {
        return Err(SessionCommandError::MissingToken(path.to_path_buf()));
    }
    Ok(user)
}

/// Log in as the user described by `user_file`.
///
/// # Errors
///
/// Returns an error if the user file is invalid or storage cannot be opened.
pub fn login(config: &StorefrontConfig, user_file: &Path) -> Result<(), SessionCommandError> {
    let user = read_user(user_file)?;
    let mut session = open_session(config)?;

    info!(username = %user.username, "Logged in as {}", user.display_name());
    session.login(user);
    Ok(())
}

/// Log out, erasing any stored profile and token even if they did not form a
/// valid login.
///
/// # Errors
///
/// Returns an error if storage cannot be opened.
pub fn logout(config: &StorefrontConfig) -> Result<(), SessionCommandError> {
    let mut session = open_session(config)?;
    let was_authenticated = session.is_authenticated();
    session.logout();
    if was_authenticated {
        info!("Logged out");
    } else {
        info!("Not logged in");
    }
    Ok(())
}

/// Print the logged-in user (without the token), or `null`.
///
/// # Errors
///
/// Returns an error if storage cannot be opened.
pub fn whoami(config: &StorefrontConfig) -> Result<(), SessionCommandError> {
    let session = open_session(config)?;
    let profile = session.user().map(|user| {
        serde_json::json!({
            "id": user.id,
            "username": user.username,
            "email": user.email,
            "name": user.display_name(),
        })
    });
    print_json(&profile)?;
    Ok(())
}
