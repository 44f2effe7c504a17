//! Git authentication configuration.

use git2::{Cred, CredentialType, RemoteCallbacks};

/// Authentication method for git remote operations.
#[derive(Debug, Clone, Default)]
pub enum GitAuth {
    /// Token-based authentication over HTTPS.
    Token(String),
    /// No authentication (public repos and local remotes).
    #[default]
    None,
}

impl GitAuth {
    /// Create token-based auth (typically a GitHub personal access token).
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Builds remote callbacks that answer credential requests with this auth.
    pub fn callbacks<'a>(&self) -> RemoteCallbacks<'a> {
        let auth = self.clone();
        let mut callbacks = RemoteCallbacks::new();

        callbacks.credentials(move |_url, username_from_url, allowed_types| match &auth {
            GitAuth::Token(token) => Cred::userpass_plaintext("x-access-token", token),
            GitAuth::None => {
                if allowed_types.contains(CredentialType::SSH_KEY) {
                    Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                } else {
                    Cred::default()
                }
            }
        });

        callbacks
    }
}
