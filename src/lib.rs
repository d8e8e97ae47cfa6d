// Library exports for the terminal host and integration tests

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod runtime;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};
