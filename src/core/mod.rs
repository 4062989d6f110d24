pub mod constants;
pub mod errors;
pub mod export;
pub mod format;
pub mod models;
pub mod reports;
pub mod services;
pub mod token;
pub mod validation;
