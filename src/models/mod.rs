//! Domain model module declarations.

pub mod attribution;
pub mod destination;
pub mod event;
pub mod guild_config;
pub mod ids;
pub mod notification;
