//! Pure check logic: tag normalization and status derivation.

pub mod status;
pub mod tag_set;
