//! Shared helpers for sink binaries.

pub mod bootstrap;
