pub mod auth_login;
pub mod panic;
pub mod token_decode;
