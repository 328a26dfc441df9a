pub mod config;
pub mod constants;
pub mod dao;
pub mod macros;
pub mod middleware;
pub mod model;
pub mod service;
pub mod types;
pub mod utils;
