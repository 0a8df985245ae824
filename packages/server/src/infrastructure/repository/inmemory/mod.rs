pub mod hub;

pub use hub::InMemoryHubRepository;
