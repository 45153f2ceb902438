// Public API for integration tests and the server binary

pub mod api;
pub mod catalog;
pub mod config;
pub mod id;
pub mod protocol;
pub mod state;
pub mod types;
