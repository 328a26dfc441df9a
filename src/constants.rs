// Headers
pub const AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIXES: [&str; 2] = ["Bearer", "bearer"];

pub const POSTGRES_POOL_SIZE: usize = 8;
pub const REDIS_POOL_SIZE: u64 = 10;

// keyed lock table size for posts and sessions
pub const LOCK_SHARDS: usize = 64;

// user and comment id length
pub const ID_LEN: usize = 16;

pub const SESSION_KEY_PREFIX: &str = "session";
// fast tier keeps a session for a day, the token itself lives a week
pub const SESSION_CACHE_TTL: u64 = 24 * 3600;
pub const TOKEN_TTL: u64 = 7 * 24 * 3600;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8042";
