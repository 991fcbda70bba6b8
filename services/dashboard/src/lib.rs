//! EventDesk dashboard
//!
//! Server-rendered dashboard where HR users schedule events with vendors
//! and vendors accept or reject them. All records live behind the upstream
//! event API; this service holds no state besides the session cookie.
//!
//! Request flow:
//! - [`guard`] resolves the session on every `/dashboard` path
//! - [`aggregator`] builds the events table with vendor names
//! - [`mutations`] creates events and records vendor decisions

pub mod aggregator;
pub mod api;
pub mod config;
pub mod guard;
pub mod mutations;
pub mod session;
pub mod state;
pub mod upstream;
