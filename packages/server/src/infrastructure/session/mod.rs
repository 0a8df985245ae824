//! SessionStore 実装
//!
//! - `inmemory`: HashMap を使った実装（開発用・単一プロセス用）

pub mod inmemory;

pub use inmemory::InMemorySessionStore;
