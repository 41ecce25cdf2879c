//! Conversion of raw page text into typed records.
//!
//! Every rule here is a pure function of its input; page access lives in
//! `services`.

pub mod fields;
pub mod movie;
pub mod names;
pub mod wanted;

use crate::error::Result;
use crate::models::{RawRecord, Record};

pub use movie::MovieNormalizer;
pub use wanted::WantedNormalizer;

/// Turns one [`RawRecord`] into a schema record.
pub trait Normalizer: Send + Sync {
    type Output: Record;

    /// Fails with a schema violation naming the offending field.
    fn normalize(&self, raw: &RawRecord) -> Result<Self::Output>;
}
