//! Lap event relay server library.
//!
//! Accepts long-lived WebSocket connections and fans every submitted lap
//! event out to all of them as a single text frame.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
