#![forbid(unsafe_code)]

//! Core: canonical events, geometry, key symbols, and configuration for the
//! claw hint-mode engine.

pub mod chord;
pub mod config;
pub mod event;
pub mod geometry;
pub mod key;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
