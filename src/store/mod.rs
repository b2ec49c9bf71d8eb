//! Concrete group directories and transaction stores

pub mod caching;
pub mod csv;
pub mod directory;
pub mod memory;

pub use caching::CachingTransactionStore;
pub use csv::CsvTransactionStore;
pub use directory::{ConfigGroupDirectory, MemoryGroupDirectory};
pub use memory::MemoryTransactionStore;
