use serde::{Deserialize, Serialize};

/// Account row from the relational store. The password hash never leaves
/// the process through serde.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip)]
    pub password: String, // sha-256 hex digest
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

/// Snapshot of a user embedded into posts, comments and sessions.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: String,
    pub username: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}
