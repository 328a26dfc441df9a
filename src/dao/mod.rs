pub mod memory;
pub mod post_dao;
pub mod postgres;
pub mod redis_db;
pub mod session_dao;
pub mod traits;
pub mod user_dao;
