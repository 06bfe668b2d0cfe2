//! Infrastructure adapters: configuration, logging, and the mock data sources.

pub mod backend;
pub mod config;
pub mod logging;
pub mod mock;
