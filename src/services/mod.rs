//! Services for provider resolution and normalization

pub mod analyzer;
pub mod directory;
pub mod normalizer;
pub mod url_classifier;

pub use directory::{ProviderDirectory, ProviderEntry};
pub use normalizer::normalize;
