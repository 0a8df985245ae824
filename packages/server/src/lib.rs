//! Venuecast realtime server library.
//!
//! Clients hold a WebSocket connection, join named rooms, and receive
//! broadcast events addressed to those rooms or to everyone.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// wiring
pub mod bootstrap;
pub mod config;
