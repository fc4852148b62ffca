//! AI Career Copilot
//!
//! Web service that reads a PDF resume, checks a pasted job description and asks
//! a chat-completions model for a structured fit analysis.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
