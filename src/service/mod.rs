pub mod account_service;
pub mod forms;
pub mod post_service;
