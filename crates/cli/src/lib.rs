//! Unity Bank CLI - wiring and command handlers

pub mod commands;
pub mod context;

pub use context::AppContext;
