use super::user::UserRef;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub created: String,
    pub author: UserRef,
    pub body: String,
    pub id: String,
}

impl Comment {
    pub fn is_written_by(&self, user_id: &str) -> bool {
        self.author.id == user_id
    }
}
