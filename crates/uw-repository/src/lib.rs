pub mod engine;
pub mod repository;

pub use engine::InMemoryRepository;
pub use repository::Repository;
