//! Repository 実装
//!
//! - `inmemory`: Hub をそのままインメモリ DB として使う実装

pub mod inmemory;

pub use inmemory::InMemoryHubRepository;
