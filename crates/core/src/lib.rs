//! Domain core of the test-data generation service.
//!
//! Schemas are registered through [`registry::SchemaRegistry`]; the
//! [`orchestrator::GenerationOrchestrator`] turns a generation request into
//! a persisted, retrievable batch using a [`synthesis::ContentSynthesizer`].

pub mod batch;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod records;
pub mod registry;
pub mod request;
pub mod response;
pub mod schema;
pub mod seed;
pub mod store;
pub mod strategy;
pub mod synthesis;
pub mod types;
