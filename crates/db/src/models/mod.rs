pub mod data_schema;
pub mod generation_batch;
