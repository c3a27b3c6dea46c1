pub mod fmi2;
mod io;
#[cfg(test)]
mod mock;
pub mod params;
mod schema;
pub mod solver;
pub mod traits;

use fmi::traits::FmiInstance;

pub use io::{RecorderState, StartValues};
pub use params::SimParams;

pub struct SimState<Inst: FmiInstance> {
    pub(crate) sim_params: SimParams,
    pub(crate) recorder_state: RecorderState<Inst>,
    pub(crate) inst: Inst,
    pub(crate) next_event_time: Option<f64>,
}

#[derive(Default, Debug)]
pub struct SimStats {
    /// End time of the simulation
    pub end_time: f64,
    /// Number of steps taken
    pub num_steps: usize,
    /// Number of events handled
    pub num_events: usize,
}

impl<Inst: FmiInstance> SimState<Inst> {
    pub fn new(inst: Inst, sim_params: SimParams, recorder_state: RecorderState<Inst>) -> Self {
        log::trace!("New {} simulation: {sim_params:?}", inst.interface_type());
        Self {
            sim_params,
            recorder_state,
            inst,
            next_event_time: None,
        }
    }

    /// Consume the state, returning the recorded outputs.
    pub fn into_recorder(self) -> RecorderState<Inst> {
        self.recorder_state
    }
}
