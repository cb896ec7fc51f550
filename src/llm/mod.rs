//! Hosted model integration module

pub mod client;
pub mod prompts;
