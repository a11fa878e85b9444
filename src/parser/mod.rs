//! Input stages: directive expansion and outline parsing.

pub mod markdown;
pub mod preprocess;
