//! Data module - CSV loading, normalization and filtering

pub mod dataset;
pub mod filters;
mod loader;
pub mod normalizer;

pub use dataset::{Dataset, DatasetError, UbsRecord};
pub use loader::DataLoader;
