use thiserror::Error as ThisError;

/// Every failure the forum core can hand back to the request layer.
///
/// Business-rule violations are typed so handlers can pick a status code;
/// anything else the stores run into travels as [`Error::Store`].
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("no post found")]
    NoPost,
    #[error("no comment found")]
    NoComment,
    #[error("forbidden action")]
    NoAccess,
    #[error("no user with such username")]
    NoUser,
    #[error("bad password")]
    BadPass,
    #[error("already exists")]
    AlreadyExist,
    #[error("no session found")]
    NoAuth,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl Error {
    pub fn is_business(&self) -> bool {
        !matches!(self, Error::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
