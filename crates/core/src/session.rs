//! Session values and the persisted client state they live in.

use serde::{Deserialize, Serialize};

use crate::theme::ThemeMode;

/// Token placeholders left behind by careless writers; they mean "no token".
const PLACEHOLDER_TOKENS: &[&str] = &["undefined", "null"];

/// An authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub name: String,
}

/// Whether `token` can authenticate requests.
pub fn is_usable_token(token: &str) -> bool {
    let token = token.trim();
    !token.is_empty() && !PLACEHOLDER_TOKENS.contains(&token)
}

/// Everything kept in persistent client storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

impl StoredState {
    /// The stored session, if its token is usable.
    pub fn session(&self) -> Option<Session> {
        let token = self.token.as_deref().filter(|t| is_usable_token(t))?;
        Some(Session {
            token: token.to_string(),
            name: self.name.clone().unwrap_or_default(),
        })
    }

    pub fn sign_in(&mut self, session: &Session) {
        self.token = Some(session.token.clone());
        self.name = Some(session.name.clone());
    }

    /// Forget the session. The theme choice survives logout.
    pub fn sign_out(&mut self) {
        self.token = None;
        self.name = None;
    }
}
