//! Pipeline services

pub mod cache;
pub mod catalogue;
pub mod numbers;
pub mod retrieval;
pub mod retry;
pub mod z3950;

pub use cache::CacheStore;
pub use catalogue::CatalogueClient;
pub use retrieval::Retriever;
pub use retry::RetryingClient;
pub use z3950::Z3950Client;
