//! Type definitions for domainstack

mod error;
mod service;

pub use error::*;
pub use service::*;
