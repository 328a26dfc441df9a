pub mod clock;
pub mod generator;
pub mod hasher;
pub mod jwt;
pub mod lock;
