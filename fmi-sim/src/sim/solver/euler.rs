use super::{detect_crossing, num_substeps, Model, Solver, SolverError};

/// Explicit forward Euler.
pub struct Euler {
    /// Current time
    time: f64,
    /// Maximum step size
    step_size: f64,
    /// Continuous states
    x: Vec<f64>,
    /// Derivatives of continuous states
    dx: Vec<f64>,
    /// Event indicators
    z: Vec<f64>,
    prez: Vec<f64>,
}

impl<M: Model> Solver<M> for Euler {
    fn new(start_time: f64, step_size: f64, nx: usize, nz: usize) -> Self {
        Self {
            time: start_time,
            step_size,
            x: vec![0.0; nx],
            dx: vec![0.0; nx],
            z: vec![0.0; nz],
            prez: vec![0.0; nz],
        }
    }

    fn step(&mut self, model: &mut M, next_time: f64) -> Result<(f64, bool), SolverError> {
        let span = next_time - self.time;
        if span <= 0.0 {
            return Ok((self.time, false));
        }

        let n = num_substeps(span, self.step_size);
        let h = span / n as f64;

        for i in 1..=n {
            let t = if i == n {
                next_time
            } else {
                self.time + h
            };
            let dt = t - self.time;

            if !self.x.is_empty() {
                model.get_continuous_states(&mut self.x)?;
                model.get_continuous_state_derivatives(&mut self.dx)?;

                for (x, dx) in self.x.iter_mut().zip(&self.dx) {
                    *x += dx * dt;
                }

                model.set_time(t)?;
                model.set_continuous_states(&self.x)?;
            } else {
                model.set_time(t)?;
            }
            self.time = t;

            if !self.z.is_empty() {
                model.get_event_indicators(&mut self.z)?;
                if detect_crossing(&mut self.prez, &self.z) {
                    return Ok((self.time, true));
                }
            }
        }

        Ok((self.time, false))
    }

    fn reset(&mut self, model: &mut M, time: f64) -> Result<(), SolverError> {
        self.time = time;
        if !self.prez.is_empty() {
            model.get_event_indicators(&mut self.prez)?;
        }
        Ok(())
    }
}
