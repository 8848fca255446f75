#![forbid(unsafe_code)]

//! `guildlog` — routes guild lifecycle events into per-guild log channels.

pub mod config;
pub mod discord;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod persistence;
pub mod router;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
