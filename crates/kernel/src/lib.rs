//! Libris kernel: layered settings and the module lifecycle shared by every
//! surface of the catalog service.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
