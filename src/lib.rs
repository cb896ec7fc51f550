//! Resume coach library

pub mod chat;
pub mod cli;
pub mod compress;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;

pub use config::Config;
pub use error::{ResumeCoachError, Result};
