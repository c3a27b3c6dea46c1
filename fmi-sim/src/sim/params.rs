use std::time::Instant;

use fmi::schema::traits::DefaultExperiment;

use crate::{options::SimOptions, Error};

/// Communication points closer than this fraction of the output interval to the stop time
/// are merged into it.
const STOP_TIME_EPS: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    pub start_time: f64,
    pub stop_time: f64,
    pub output_interval: f64,
    /// Maximum integrator step for Model-Exchange
    pub step_size: f64,
    pub tolerance: Option<f64>,
    pub deadline: Option<Instant>,
}

impl SimParams {
    /// Resolve the simulation parameters. Explicit options take precedence over the model's
    /// `DefaultExperiment`.
    pub fn new_from_options<DE: DefaultExperiment>(
        options: &SimOptions,
        default_experiment: Option<&DE>,
    ) -> Result<Self, Error> {
        let start_time = options
            .start_time
            .or(default_experiment.and_then(|de| de.start_time()))
            .unwrap_or(0.0);

        let stop_time = options
            .stop_time
            .or(default_experiment.and_then(|de| de.stop_time()))
            .unwrap_or(1.0);

        if stop_time.is_nan() || stop_time < start_time {
            return Err(Error::InvalidParams(format!(
                "`stop_time` ({stop_time}) must not be before `start_time` ({start_time})"
            )));
        }

        let output_interval = options
            .output_interval
            .or(default_experiment.and_then(|de| de.step_size()))
            .unwrap_or_else(|| (stop_time - start_time) / 500.0);

        if output_interval.is_nan() || output_interval <= 0.0 {
            return Err(Error::InvalidParams(
                "`output_interval` must be positive".to_owned(),
            ));
        }

        let step_size = options.step_size.unwrap_or(output_interval);
        if step_size.is_nan() || step_size <= 0.0 {
            return Err(Error::InvalidParams("`step_size` must be positive".to_owned()));
        }

        let tolerance = options
            .tolerance
            .or(default_experiment.and_then(|de| de.tolerance()));

        Ok(Self {
            start_time,
            stop_time,
            output_interval,
            step_size,
            tolerance,
            deadline: options.deadline,
        })
    }

    /// Number of output intervals between start and stop time.
    pub fn num_steps(&self) -> usize {
        let steps = (self.stop_time - self.start_time) / self.output_interval;
        (steps - STOP_TIME_EPS).ceil().max(0.0) as usize
    }

    /// The `n`-th communication point. The last one is exactly the stop time.
    pub fn communication_point(&self, n: usize) -> f64 {
        if n >= self.num_steps() {
            self.stop_time
        } else {
            self.start_time + n as f64 * self.output_interval
        }
    }

    /// Fail with [`Error::Timeout`] once the deadline has passed.
    pub fn check_deadline(&self, time: f64) -> Result<(), Error> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::Timeout(time)),
            _ => Ok(()),
        }
    }
}
