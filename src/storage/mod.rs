//! Transaction store implementations

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use in_memory::InMemoryTransactionStore;
#[cfg(feature = "mongodb_backend")]
pub use mongodb::MongoTransactionStore;
