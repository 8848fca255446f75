//! Discord integration: REST gateway, event handler and slash commands.

pub mod client;
pub mod commands;
pub mod handler;

pub use client::{DiscordGateway, DiscordService};
