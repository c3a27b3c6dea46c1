use fmi::fmi2::{instance::ModelExchange, Fmi2Error};

mod euler;
mod rk4;

pub use euler::Euler;
pub use rk4::Rk4;

/// The continuous-time view of a model that a [`Solver`] integrates.
pub trait Model {
    fn set_time(&mut self, time: f64) -> Result<(), SolverError>;
    fn get_continuous_states(&mut self, x: &mut [f64]) -> Result<(), SolverError>;
    fn set_continuous_states(&mut self, states: &[f64]) -> Result<(), SolverError>;
    fn get_continuous_state_derivatives(&mut self, dx: &mut [f64]) -> Result<(), SolverError>;
    fn get_event_indicators(&mut self, z: &mut [f64]) -> Result<(), SolverError>;
}

impl<Inst: ModelExchange> Model for Inst {
    fn set_time(&mut self, time: f64) -> Result<(), SolverError> {
        ModelExchange::set_time(self, time)?;
        Ok(())
    }

    fn get_continuous_states(&mut self, x: &mut [f64]) -> Result<(), SolverError> {
        ModelExchange::get_continuous_states(self, x)?;
        Ok(())
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<(), SolverError> {
        ModelExchange::set_continuous_states(self, states)?;
        Ok(())
    }

    fn get_continuous_state_derivatives(&mut self, dx: &mut [f64]) -> Result<(), SolverError> {
        ModelExchange::get_derivatives(self, dx)?;
        Ok(())
    }

    fn get_event_indicators(&mut self, z: &mut [f64]) -> Result<(), SolverError> {
        ModelExchange::get_event_indicators(self, z)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Model evaluation failed: {0}")]
    Model(#[from] Fmi2Error),
}

pub trait Solver<M> {
    /// Create a new Solver instance.
    /// # Arguments
    /// * `step_size` - The maximum integration step.
    /// * `nx` - The number of continuous states.
    /// * `nz` - The number of event indicators.
    fn new(start_time: f64, step_size: f64, nx: usize, nz: usize) -> Self;

    /// Integrate up to `next_time`, in steps no longer than the step size.
    ///
    /// Returns early when an event indicator changes its sign.
    ///
    /// # Returns
    /// A tuple of (`time_reached`, `state_event`)
    fn step(&mut self, model: &mut M, next_time: f64) -> Result<(f64, bool), SolverError>;

    /// Reset the solver after an event at `time`.
    fn reset(&mut self, model: &mut M, time: f64) -> Result<(), SolverError>;
}

/// Number of equal sub-steps of at most `step_size` covering `span`.
fn num_substeps(span: f64, step_size: f64) -> usize {
    (span / step_size - 1e-9).ceil().max(1.0) as usize
}

/// Compare the event indicators against their previous values, remembering the new ones.
fn detect_crossing(prez: &mut [f64], z: &[f64]) -> bool {
    let mut state_event = false;
    for (prez, &z) in prez.iter_mut().zip(z) {
        if (*prez <= 0.0 && z > 0.0) || (*prez > 0.0 && z <= 0.0) {
            state_event = true;
        }
        *prez = z;
    }
    state_event
}
