//! Flat-text line codec for task records.

pub mod record_codec;
