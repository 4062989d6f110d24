pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::FintrackError;
pub use crate::core::services::FintrackService;

#[cfg(test)]
mod tests;
