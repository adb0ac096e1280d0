//! Output generation.
//!
//! - [`json`]: the dated card file and its existence check

pub mod json;
