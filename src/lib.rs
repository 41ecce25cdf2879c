// src/lib.rs

//! Incremental, deduplicated harvest of ranked movies and wanted persons.

pub mod error;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
