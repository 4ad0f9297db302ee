//! OpenHIM API token authentication
//!
//! OpenHIM hands out a per-user salt from `GET /authenticate/{username}`.
//! Every API call then carries four headers; the token is
//! `sha512_hex(sha512_hex(salt + password) + salt + ts)`.

use serde::Deserialize;
use sha2::{Digest, Sha512};

/// Salt challenge returned by `GET /authenticate/{username}`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthChallenge {
    /// Per-user password salt
    pub salt: String,

    /// Server time the challenge was issued
    #[serde(default)]
    pub ts: Option<String>,
}

/// Headers attached to an authenticated OpenHIM API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    username: String,
    ts: String,
    salt: String,
    token: String,
}

impl AuthHeaders {
    /// Derives the request headers from a challenge
    ///
    /// `ts` is the client timestamp; it is sent verbatim and mixed into the token.
    pub fn new(username: &str, password: &str, challenge: &AuthChallenge, ts: String) -> Self {
        let token = compute_token(password, &challenge.salt, &ts);
        Self {
            username: username.to_string(),
            ts,
            salt: challenge.salt.clone(),
            token,
        }
    }

    /// Attaches the headers to a request
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("auth-username", &self.username)
            .header("auth-ts", &self.ts)
            .header("auth-salt", &self.salt)
            .header("auth-token", &self.token)
    }

    /// The derived token
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Computes the OpenHIM request token
pub fn compute_token(password: &str, salt: &str, ts: &str) -> String {
    let password_hash = sha512_hex(&format!("{salt}{password}"));
    sha512_hex(&format!("{password_hash}{salt}{ts}"))
}

fn sha512_hex(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}
