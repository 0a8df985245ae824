//! Utilities shared by the venuecast packages.

pub mod logger;
pub mod time;
