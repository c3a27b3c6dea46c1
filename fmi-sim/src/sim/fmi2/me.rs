use arrow::record_batch::RecordBatch;
use fmi::{
    fmi2::{
        binding,
        import::Fmi2Import,
        instance::{Common, InstanceME, ModelExchange},
    },
    traits::FmiImport,
    EventFlags,
};

use crate::{
    options::{SimOptions, SolverKind},
    sim::{
        params::SimParams,
        solver::{Euler, Rk4, Solver},
        traits::{FmiSchemaBuilder, InstRecordValues, SimHandleEvents, SimMe},
        RecorderState, SimState, SimStats,
    },
    Error,
};

impl<Inst> SimHandleEvents for SimState<Inst>
where
    Inst: ModelExchange<ValueRef = binding::fmi2ValueReference>,
{
    fn handle_events(&mut self, time: f64) -> Result<(bool, bool), Error> {
        let mut event_flags = EventFlags::default();
        let mut reset_solver = false;

        loop {
            self.inst.new_discrete_states(&mut event_flags)?;

            reset_solver |= event_flags.values_of_continuous_states_changed
                || event_flags.nominals_of_continuous_states_changed;

            if event_flags.terminate_simulation {
                log::info!("Termination requested by {} at t = {time}", self.inst.name());
                return Ok((reset_solver, true));
            }

            if !event_flags.discrete_states_need_update {
                break;
            }
        }

        self.next_event_time = event_flags.next_event_time;
        Ok((reset_solver, false))
    }
}

impl<Inst> SimMe<Inst> for SimState<Inst>
where
    Inst: ModelExchange<ValueRef = binding::fmi2ValueReference>,
{
    fn main_loop<S: Solver<Inst>>(&mut self, mut solver: S) -> Result<SimStats, Error> {
        let mut stats = SimStats::default();
        let num_steps = self.sim_params.num_steps();
        let mut time = self.sim_params.start_time;

        solver.reset(&mut self.inst, time)?;
        self.inst.record_outputs(time, &mut self.recorder_state)?;

        while stats.num_steps < num_steps {
            self.sim_params.check_deadline(time)?;

            // Use the earlier of the next time event and the next regular point
            let next_regular_point = self.sim_params.communication_point(stats.num_steps + 1);
            let (next_communication_point, time_event) = match self.next_event_time {
                Some(event_time) if event_time <= next_regular_point => (event_time, true),
                _ => (next_regular_point, false),
            };

            let (time_reached, state_event) =
                solver.step(&mut self.inst, next_communication_point)?;
            time = time_reached;
            let time_event = time_event && time >= next_communication_point;

            let (step_event, terminate) = self.inst.completed_integrator_step(true)?;
            if terminate {
                log::info!("Termination requested by {} at t = {time}", self.inst.name());
                self.inst.record_outputs(time, &mut self.recorder_state)?;
                break;
            }

            if time_event || state_event || step_event {
                log::trace!(
                    "Event encountered at t = {time}. [Time: {time_event}, State: {state_event}, Step: {step_event}]"
                );
                stats.num_events += 1;

                self.inst.enter_event_mode()?;
                let (reset_solver, terminate) = self.handle_events(time)?;

                if terminate {
                    self.inst.record_outputs(time, &mut self.recorder_state)?;
                    break;
                }

                self.inst.enter_continuous_time_mode()?;

                if reset_solver {
                    log::trace!("Continuous states re-initialized at t = {time}");
                }
                solver.reset(&mut self.inst, time)?;
            }

            if time >= next_regular_point {
                stats.num_steps += 1;
                self.inst.record_outputs(time, &mut self.recorder_state)?;
            }
        }

        stats.end_time = time;
        self.inst.terminate()?;

        Ok(stats)
    }
}

/// Run a model-exchange simulation of the imported FMU.
pub fn model_exchange(import: &Fmi2Import, options: &SimOptions) -> Result<RecordBatch, Error> {
    let md = import.model_description();
    let sim_params = SimParams::new_from_options(options, md.default_experiment.as_ref())?;

    let start_values = md.parse_start_values(&options.initial_values)?;
    let recorder_state = RecorderState::<InstanceME>::new(
        md.output_fields(options.outputs.as_deref())?,
        &sim_params,
    );

    let nx = md.num_states();
    let nz = md.num_event_indicators();
    let (start_time, step_size) = (sim_params.start_time, sim_params.step_size);

    let inst = import.instantiate_me("inst1", false, true)?;
    let mut sim_state = SimState::new(inst, sim_params, recorder_state);
    sim_state.initialize(&start_values)?;

    // The FMU is in Event Mode after leaving Initialization Mode
    let (_, terminate) = sim_state.handle_events(start_time)?;
    if terminate {
        sim_state
            .inst
            .record_outputs(start_time, &mut sim_state.recorder_state)?;
        sim_state.inst.terminate()?;
        return Ok(sim_state.into_recorder().finish()?);
    }
    sim_state.inst.enter_continuous_time_mode()?;

    let stats = match options.solver {
        SolverKind::Euler => {
            sim_state.main_loop(<Euler as Solver<InstanceME>>::new(start_time, step_size, nx, nz))?
        }
        SolverKind::Rk4 => {
            sim_state.main_loop(<Rk4 as Solver<InstanceME>>::new(start_time, step_size, nx, nz))?
        }
    };

    log::info!(
        "Simulation finished at t = {:.1} after {} steps and {} events.",
        stats.end_time,
        stats.num_steps,
        stats.num_events
    );

    Ok(sim_state.into_recorder().finish()?)
}

#[cfg(test)]
mod tests {
    use arrow::{array::AsArray, datatypes::Float64Type};
    use float_cmp::assert_approx_eq;
    use fmi::{traits::FmiInstance, InterfaceType};

    use super::*;
    use crate::sim::{mock::FallingBody, StartValues};

    fn run<S: Solver<FallingBody>>(
        options: &SimOptions,
        inst: FallingBody,
        solver: S,
    ) -> (SimStats, SimState<FallingBody>) {
        let md = inst.model_description();
        let sim_params =
            SimParams::new_from_options(options, md.default_experiment.as_ref()).unwrap();
        let outputs = md.output_fields(options.outputs.as_deref()).unwrap();
        let recorder_state = RecorderState::new(outputs, &sim_params);

        let mut state = SimState::new(inst, sim_params, recorder_state);
        state.initialize(&StartValues { variables: vec![] }).unwrap();
        let (_, terminate) = state.handle_events(0.0).unwrap();
        assert!(!terminate);
        state.inst.enter_continuous_time_mode().unwrap();

        let stats = SimMe::main_loop(&mut state, solver).unwrap();
        (stats, state)
    }

    fn heights(state: SimState<FallingBody>) -> (Vec<f64>, Vec<f64>) {
        let batch = state.into_recorder().finish().unwrap();
        let time = batch.column(0).as_primitive::<Float64Type>();
        let height = batch
            .column_by_name("body1.r_0[2]")
            .unwrap()
            .as_primitive::<Float64Type>();
        (time.values().to_vec(), height.values().to_vec())
    }

    #[test_log::test]
    fn test_free_fall() {
        let options = SimOptions {
            output_interval: Some(0.1),
            ..Default::default()
        };
        let solver = <Rk4 as Solver<FallingBody>>::new(0.0, 0.1, 2, 0);
        let (stats, state) = run(&options, FallingBody::new(InterfaceType::ModelExchange), solver);

        assert_eq!(stats.num_steps, 10);
        assert_eq!(stats.num_events, 0);
        assert_eq!(stats.end_time, 1.0);
        assert_eq!(state.inst.calls.last(), Some(&"terminate"));

        let (time, height) = heights(state);
        assert_eq!(time.len(), 11);
        assert_eq!(time[10], 1.0);
        // Exact for a constant acceleration
        assert_approx_eq!(f64, height[10], 0.5 - 0.5 * 9.81, epsilon = 1e-9);
    }

    #[test_log::test]
    fn test_euler_free_fall() {
        let options = SimOptions {
            output_interval: Some(0.1),
            ..Default::default()
        };
        let solver = <Euler as Solver<FallingBody>>::new(0.0, 1e-4, 2, 0);
        let (_, state) = run(&options, FallingBody::new(InterfaceType::ModelExchange), solver);

        let (_, height) = heights(state);
        assert_approx_eq!(f64, height[10], 0.5 - 0.5 * 9.81, epsilon = 1e-3);
    }

    #[test_log::test]
    fn test_state_events() {
        let options = SimOptions {
            stop_time: Some(2.0),
            output_interval: Some(0.01),
            ..Default::default()
        };
        let solver = <Rk4 as Solver<FallingBody>>::new(0.0, 1e-3, 2, 1);
        let (stats, state) = run(&options, FallingBody::new(InterfaceType::ModelExchange), solver);

        // Bounces at t = 0.32, 0.83, 1.24, 1.56 and 1.83
        assert!(stats.num_events >= 3, "{stats:?}");
        assert!(state
            .inst
            .calls
            .iter()
            .any(|call| *call == "enter_event_mode"));

        let (time, height) = heights(state);
        assert_eq!(time.len(), 201);
        assert!(height.iter().all(|h| *h > -0.01));
        // Back up after the first bounce
        assert!(height[60] > 0.1);
    }

    #[test_log::test]
    fn test_time_event() {
        let options = SimOptions {
            output_interval: Some(0.1),
            ..Default::default()
        };
        let mut inst = FallingBody::new(InterfaceType::ModelExchange);
        inst.time_event = Some(0.25);

        let solver = <Rk4 as Solver<FallingBody>>::new(0.0, 0.1, 2, 0);
        let (stats, state) = run(&options, inst, solver);

        assert_eq!(stats.num_events, 1);
        assert_eq!(state.inst.time_events_handled, 1);

        // Only the regular communication points are recorded
        let (time, _) = heights(state);
        assert_eq!(time.len(), 11);
        assert_approx_eq!(f64, time[3], 0.3, ulps = 4);
    }
}
