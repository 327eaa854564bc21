//! Runtime support for code generated by `#[derive(Record)]`.
//!
//! Everything here is an implementation detail and may change without
//! notice.

pub use once_cell::sync::Lazy;
