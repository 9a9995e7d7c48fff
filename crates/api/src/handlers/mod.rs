pub mod data;
pub mod schemas;
