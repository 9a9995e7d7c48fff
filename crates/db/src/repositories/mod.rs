//! Zero-sized repositories; every method takes the pool explicitly.

pub mod data_schema_repo;
pub mod generation_batch_repo;

pub use data_schema_repo::DataSchemaRepo;
pub use generation_batch_repo::GenerationBatchRepo;
