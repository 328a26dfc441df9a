use super::user::UserRef;
use serde::{Deserialize, Serialize};

/// An issued login. `id` is the signed token itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user: UserRef,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserRef) -> Self {
        Self {
            id: token.into(),
            user,
        }
    }
}

/// Claims carried inside a session token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user: UserRef,
    pub iat: i64, // issued at, unix seconds
    pub exp: i64, // expires at, unix seconds
    pub jti: String,
}
