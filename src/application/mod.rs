//! Application layer - use cases and services

pub mod commands;
pub mod handler;

pub use commands::{Cli, Commands, CommandExecutor};
pub use handler::{CheckPricesHandler, TriggerEvent};
