use super::{detect_crossing, num_substeps, Model, Solver, SolverError};

/// Classical fourth-order Runge-Kutta with a fixed step size.
pub struct Rk4 {
    time: f64,
    step_size: f64,
    /// States at the start of the current step
    x: Vec<f64>,
    /// Stage states
    xs: Vec<f64>,
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    z: Vec<f64>,
    prez: Vec<f64>,
}

/// Evaluate the derivatives at `x0 + h * k_in`.
fn stage<M: Model>(
    model: &mut M,
    time: f64,
    x0: &[f64],
    h: f64,
    k_in: &[f64],
    xs: &mut [f64],
    k_out: &mut [f64],
) -> Result<(), SolverError> {
    for ((xi, x0), k) in xs.iter_mut().zip(x0).zip(k_in) {
        *xi = x0 + h * k;
    }
    model.set_time(time)?;
    model.set_continuous_states(xs)?;
    model.get_continuous_state_derivatives(k_out)
}

impl Rk4 {
    /// Advance the states from `t0` to `t1` in a single step.
    fn integrate<M: Model>(&mut self, model: &mut M, t0: f64, t1: f64) -> Result<(), SolverError> {
        let h = t1 - t0;
        model.get_continuous_states(&mut self.x)?;
        model.get_continuous_state_derivatives(&mut self.k1)?;

        let t_half = t0 + h / 2.0;
        stage(model, t_half, &self.x, h / 2.0, &self.k1, &mut self.xs, &mut self.k2)?;
        stage(model, t_half, &self.x, h / 2.0, &self.k2, &mut self.xs, &mut self.k3)?;
        stage(model, t1, &self.x, h, &self.k3, &mut self.xs, &mut self.k4)?;

        for (i, x) in self.x.iter_mut().enumerate() {
            *x += h / 6.0 * (self.k1[i] + 2.0 * self.k2[i] + 2.0 * self.k3[i] + self.k4[i]);
        }
        model.set_continuous_states(&self.x)
    }
}

impl<M: Model> Solver<M> for Rk4 {
    fn new(start_time: f64, step_size: f64, nx: usize, nz: usize) -> Self {
        Self {
            time: start_time,
            step_size,
            x: vec![0.0; nx],
            xs: vec![0.0; nx],
            k1: vec![0.0; nx],
            k2: vec![0.0; nx],
            k3: vec![0.0; nx],
            k4: vec![0.0; nx],
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

            if self.x.is_empty() {
                model.set_time(t)?;
            } else {
                let start = self.time;
                self.integrate(model, start, t)?;
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

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::sim::solver::tests::Decay;

    #[test]
    fn test_decay() {
        let mut model = Decay::default();
        let mut solver = <Rk4 as Solver<Decay>>::new(0.0, 0.05, 1, 0);

        for k in 1..=10 {
            let (time, _) = solver.step(&mut model, k as f64 * 0.1).unwrap();
            assert_eq!(time, k as f64 * 0.1);
        }
        assert_eq!(model.time, 1.0);
        assert_approx_eq!(f64, model.x, (-1.0f64).exp(), epsilon = 1e-7);
    }

    #[test]
    fn test_more_accurate_than_euler() {
        let exact = (-2.0f64).exp();

        let mut model = Decay::default();
        let mut rk4 = <Rk4 as Solver<Decay>>::new(0.0, 0.1, 1, 0);
        rk4.step(&mut model, 2.0).unwrap();
        let rk4_error = (model.x - exact).abs();

        let mut model = Decay::default();
        let mut euler = <crate::sim::solver::Euler as Solver<Decay>>::new(0.0, 0.1, 1, 0);
        euler.step(&mut model, 2.0).unwrap();
        let euler_error = (model.x - exact).abs();

        assert!(rk4_error < 1e-5);
        assert!(rk4_error * 100.0 < euler_error);
    }

    #[test]
    fn test_state_event() {
        let mut model = Decay::default();
        let mut solver = <Rk4 as Solver<Decay>>::new(0.0, 0.01, 1, 1);
        solver.reset(&mut model, 0.0).unwrap();

        let (time, state_event) = solver.step(&mut model, 1.0).unwrap();
        assert!(state_event);
        // x(t) = 0.5 at t = ln 2
        assert!(time > std::f64::consts::LN_2 && time <= std::f64::consts::LN_2 + 0.011);

        // Continuing past the event does not report it again
        let (time, state_event) = solver.step(&mut model, 1.0).unwrap();
        assert_eq!(time, 1.0);
        assert!(!state_event);
    }
}
