//! Core traits and types for adaptive sampling.
//!
//! This crate defines the shared abstractions that samplers and drivers
//! build on:
//!
//! - [`Sampler`] - accepts observations, reports a loss, and proposes the
//!   next points to evaluate
//! - [`Proposal`] - proposed points paired with their expected loss
//!   improvements
//! - [`Restore`] and [`Restored`] - explicit state capture and scoped
//!   restoration, used for proposing points without committing them
//! - [`Model`] - the expensive function being sampled
//! - [`Observer`] - receives driver events and optionally returns control
//!   actions

mod model;
mod observer;
mod restore;
mod sampler;

pub use model::Model;
pub use observer::Observer;
pub use restore::{Restore, Restored};
pub use sampler::{Proposal, Sampler};
