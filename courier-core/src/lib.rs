//! Courier Core
//!
//! Core types shared by the Courier job client and front-end.
//!
//! This crate contains:
//! - Domain types: jobs as listed by the job service and the editable job form
//! - DTOs: decoding helpers for job service payloads

pub mod domain;
pub mod dto;
