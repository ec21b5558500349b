//! Core domain types
//!
//! These types describe what the external job service stores and what the
//! request form edits. The service owns persistence and execution; this crate
//! only carries the shapes across the wire.

pub mod form;
pub mod job;
