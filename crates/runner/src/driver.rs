use tessel_core::{Model, Observer, Sampler};
use tracing::{debug, info, warn};

use super::{Action, Config, Error, Event, Solution, Status};

/// Core loop behind [`run`](crate::run).
pub(super) fn drive<M, S, Obs>(
    model: &M,
    sampler: &mut S,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    M: Model<Input = S::Point, Output = S::Value>,
    S: Sampler,
    Obs: for<'a> Observer<Event<'a, M>, Action>,
{
    let mut evaluations = 0;
    let mut round = 0_usize;

    loop {
        let loss = sampler.loss(true);
        if loss <= config.goal() {
            return Ok(finish(Status::Converged, loss, evaluations));
        }
        if evaluations >= config.max_points() {
            return Ok(finish(Status::MaxPoints, loss, evaluations));
        }

        let batch = config.batch_size().min(config.max_points() - evaluations);
        let proposal = sampler
            .choose_points(batch, true)
            .map_err(|e| Error::Sampler(Box::new(e)))?;
        debug!(round, batch, proposed = proposal.len(), loss, "requested points");

        if proposal.is_empty() {
            warn!(round, "sampler proposed no points");
            return Ok(finish(Status::Exhausted, loss, evaluations));
        }

        for point in proposal.points {
            let step = evaluate(model, point, evaluations, &mut observer);

            if let Some((point, value)) = step.observed {
                evaluations += 1;
                if let Err(e) = sampler.add_point(point, Some(value)) {
                    sampler.remove_unfinished();
                    return Err(Error::Sampler(Box::new(e)));
                }
            }

            if step.stop {
                sampler.remove_unfinished();
                let loss = sampler.loss(true);
                return Ok(finish(Status::StoppedByObserver, loss, evaluations));
            }

            if let Some(error) = step.error {
                sampler.remove_unfinished();
                return Err(Error::Model(Box::new(error)));
            }
        }

        round += 1;
    }
}

fn finish(status: Status, loss: f64, evaluations: usize) -> Solution {
    info!(?status, loss, evaluations, "run finished");
    Solution {
        status,
        loss,
        evaluations,
    }
}

/// The outcome of a single evaluation after the observer has seen it.
struct Step<P, V, E> {
    observed: Option<(P, V)>,
    error: Option<E>,
    stop: bool,
}

/// Evaluate `point`, emit an event, and record the observer's action.
fn evaluate<M, Obs>(
    model: &M,
    point: M::Input,
    evaluations: usize,
    observer: &mut Obs,
) -> Step<M::Input, M::Output, M::Error>
where
    M: Model,
    Obs: for<'a> Observer<Event<'a, M>, Action>,
{
    match model.call(&point) {
        Ok(value) => {
            let event = Event::Evaluated {
                point: &point,
                value: &value,
                evaluations: evaluations + 1,
            };
            let stop = matches!(observer.observe(&event), Some(Action::StopEarly));
            Step {
                observed: Some((point, value)),
                error: None,
                stop,
            }
        }
        Err(error) => {
            let event = Event::ModelFailed {
                point: &point,
                error: &error,
            };
            let stop = matches!(observer.observe(&event), Some(Action::StopEarly));
            if !stop {
                warn!("model evaluation failed: {error}");
            }
            Step {
                observed: None,
                error: Some(error),
                stop,
            }
        }
    }
}
