#![recursion_limit = "256"]
//! Libris application library
//!
//! The catalog domain plus the bootstrap that wires it into the kernel and
//! the HTTP server.

pub mod modules;
pub mod server;

pub use modules::catalog;
