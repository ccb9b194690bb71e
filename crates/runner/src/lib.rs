//! Sequential driver loop for adaptive samplers.
//!
//! [`run`] alternates between asking a [`Sampler`] for points and evaluating
//! them with a [`Model`], in a single thread and in request order:
//!
//! 1. Stop with [`Status::Converged`] once `sampler.loss(true) <= goal`.
//! 2. Stop with [`Status::MaxPoints`] once the evaluation budget is spent.
//! 3. Request a batch with `choose_points(batch, true)`, which marks the
//!    points pending.
//! 4. Evaluate each point and feed the value back with `add_point`.
//!
//! # Observer Events
//!
//! The runner emits one [`Event`] per attempted evaluation:
//!
//! - [`Event::Evaluated`] - the model returned a value
//! - [`Event::ModelFailed`] - the model returned an error
//!
//! Observers can return [`Action::StopEarly`] to halt after the current
//! point. Returning `StopEarly` from a failure event ends the run normally
//! instead of propagating the model error.
//!
//! Whenever the run ends before a batch is fully evaluated, the remaining
//! pending points are removed with
//! [`remove_unfinished`](Sampler::remove_unfinished).

mod action;
mod config;
mod driver;
mod error;
mod event;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use tessel_core::{Model, Observer, Sampler};

/// Drives `sampler` until it converges, the budget runs out, or the
/// observer stops it.
///
/// # Errors
///
/// Returns an error if the model or sampler fails and the observer does not
/// return [`Action::StopEarly`] for the failure.
pub fn run<M, S, Obs>(
    model: &M,
    sampler: &mut S,
    config: &Config,
    observer: Obs,
) -> Result<Solution, Error>
where
    M: Model<Input = S::Point, Output = S::Value>,
    S: Sampler,
    Obs: for<'a> Observer<Event<'a, M>, Action>,
{
    driver::drive(model, sampler, config, observer)
}

/// Drives `sampler` without observer support.
///
/// This is a convenience wrapper around [`run`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if the model or sampler fails.
pub fn run_unobserved<M, S>(model: &M, sampler: &mut S, config: &Config) -> Result<Solution, Error>
where
    M: Model<Input = S::Point, Output = S::Value>,
    S: Sampler,
{
    run(model, sampler, config, ())
}
