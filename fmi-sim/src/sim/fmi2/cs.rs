use arrow::record_batch::RecordBatch;
use fmi::{
    fmi2::{
        binding,
        import::Fmi2Import,
        instance::{CoSimulation, InstanceCS},
        Fmi2Error,
    },
    traits::FmiImport,
};

use crate::{
    options::SimOptions,
    sim::{
        params::SimParams,
        traits::{FmiSchemaBuilder, InstRecordValues, SimCs},
        RecorderState, SimState, SimStats,
    },
    Error,
};

impl<Inst> SimCs for SimState<Inst>
where
    Inst: CoSimulation<ValueRef = binding::fmi2ValueReference>,
{
    fn main_loop(&mut self) -> Result<SimStats, Error> {
        let mut stats = SimStats::default();
        let num_steps = self.sim_params.num_steps();

        loop {
            let time = self.sim_params.communication_point(stats.num_steps);

            self.inst.record_outputs(time, &mut self.recorder_state)?;

            if stats.num_steps >= num_steps {
                stats.end_time = time;
                break;
            }

            self.sim_params.check_deadline(time)?;

            let step_size = self.sim_params.communication_point(stats.num_steps + 1) - time;

            match self.inst.do_step(time, step_size, true) {
                Err(Fmi2Error::Discard) => {
                    if self.inst.terminated()? {
                        let last_time = self.inst.last_successful_time()?;
                        log::info!(
                            "Termination requested by {} at t = {last_time}",
                            self.inst.name()
                        );

                        if last_time > time {
                            self.inst
                                .record_outputs(last_time, &mut self.recorder_state)?;
                        }

                        stats.end_time = last_time;
                        break;
                    }
                    log::warn!("Step at t = {time} was discarded");
                }
                Err(e) => return Err(e.into()),
                Ok(_) => {}
            }

            stats.num_steps += 1;
        }

        self.inst.terminate()?;

        Ok(stats)
    }
}

/// Run a co-simulation of the imported FMU.
pub fn co_simulation(import: &Fmi2Import, options: &SimOptions) -> Result<RecordBatch, Error> {
    let md = import.model_description();
    let sim_params = SimParams::new_from_options(options, md.default_experiment.as_ref())?;

    let start_values = md.parse_start_values(&options.initial_values)?;
    let recorder_state = RecorderState::<InstanceCS>::new(
        md.output_fields(options.outputs.as_deref())?,
        &sim_params,
    );

    let inst = import.instantiate_cs("inst1", false, true)?;
    let mut sim_state = SimState::new(inst, sim_params, recorder_state);
    sim_state.initialize(&start_values)?;
    let stats = sim_state.main_loop()?;

    log::info!(
        "Simulation finished at t = {:.1} after {} steps.",
        stats.end_time,
        stats.num_steps
    );

    Ok(sim_state.into_recorder().finish()?)
}
