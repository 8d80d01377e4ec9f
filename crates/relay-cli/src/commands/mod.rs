//! CLI commands

pub mod backends;
pub mod chat;
pub mod check;
pub mod resolve;
