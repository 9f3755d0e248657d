//! CLI command implementations for the Keycode policy gate.

pub mod check;
pub mod config;
pub mod mask;
pub mod replay;
pub mod whitelist;
