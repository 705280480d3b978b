//! # Modmap Application Library
//!
//! Thin library target so integration tests can drive the CLI layer
//! without spawning the binary. All behavior lives in [`cli`]; the
//! binary itself only initializes tracing and dispatches here.

pub mod cli;
