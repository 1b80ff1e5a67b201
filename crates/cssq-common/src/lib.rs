//! Common utilities for the cssq selector engine.
//!
//! This crate provides shared infrastructure used by all cssq components:
//! - **Warning System** - colored terminal output for tolerated-but-suspect input

pub mod warning;
