//! Conversation module
//! Owns session state and the per-turn pipeline orchestration

pub mod controller;
pub mod session;
