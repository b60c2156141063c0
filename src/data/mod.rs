//! Dataset loading.

pub mod loader;

pub use loader::load_dataset;
