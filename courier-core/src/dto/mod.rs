//! Data Transfer Objects for job service communication
//!
//! The job service is external and its listing payload has not always been a
//! plain array. DTOs here turn raw payloads into domain types.

pub mod job;
