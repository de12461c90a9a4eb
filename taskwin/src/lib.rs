//! `taskwin`: client for a windowed task-tracking service.
//!
//! The [`engine::SyncEngine`] keeps the latest five incomplete tasks in step
//! with the service through a [`gateway::TaskGateway`], re-listing after every
//! mutation. [`validate`] screens the creation form, [`ui`] renders snapshots.

pub mod config;
pub mod engine;
pub mod gateway;
pub mod ui;
pub mod validate;
