//! Program layer: JSON schemas + validated in-memory structures.
//!
//! This module is kept separate from inference and rendering.
//! It owns:
//! - Address / Namespace types (data-table addresses)
//! - Tag catalog and rung listing
//! - Namespace roles consumed by interlock inference

pub mod addr;
pub mod catalog;
pub mod roles;
pub mod rung;
pub mod source;

pub use addr::{Address, Namespace};
pub use catalog::{TagCatalog, TagEntry};
pub use roles::NamespaceRoles;
pub use rung::Rung;
pub use source::{Program, load_program};
