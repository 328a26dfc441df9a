use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Direction of a single vote. Stored and served as `1` / `-1`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(into = "i8", try_from = "i8")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn sign(self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl From<VoteValue> for i8 {
    fn from(v: VoteValue) -> Self {
        v.sign() as i8
    }
}

impl TryFrom<i8> for VoteValue {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            _ => Err(format!("vote must be 1 or -1, got {}", v)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub vote: VoteValue,
    pub user: String, // voter's user id
}

impl Vote {
    pub fn new(vote: VoteValue, user: impl Into<String>) -> Self {
        Self {
            vote,
            user: user.into(),
        }
    }
}
