//! Taskwin reference task service.
//!
//! Exposes the REST task resource for local runs, embedding, and tests.

pub mod api;
pub mod config;
pub mod store;
