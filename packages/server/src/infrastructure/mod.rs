//! Infrastructure layer: concrete implementations of the domain traits and
//! the DTOs spoken on the wire.

pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod session;
