// src/models/mod.rs

//! Domain models for the harvest pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod movie;
mod record;
mod report;
mod wanted;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, LoggingConfig, MovieSelectors, MovieSourceConfig, WantedSelectors,
    WantedSourceConfig,
};
pub use movie::{Amount, Movie};
pub use record::{AssetRef, RawRecord, Record, WorkItem};
pub use report::{AssetFailure, ItemFailure, RunReport};
pub use wanted::WantedPerson;
