//! Safe method surface of an FMI 2.0 component, split by interface.
//!
//! Every call returns the component's status: `Ok` for `OK`/`Warning`/`Pending` and
//! [`Fmi2Error`] for anything that stops the run.

use crate::{
    fmi2::{Fmi2Error, Fmi2Res},
    traits::FmiInstance,
    EventFlags,
};

use super::binding::{fmi2Boolean, fmi2Integer, fmi2Real, fmi2ValueReference};

/// Lifecycle and variable access shared by both interfaces.
pub trait Common: FmiInstance {
    /// Fix the experiment's time span before initialization.
    ///
    /// A `stop_time` of `Some(..)` makes stepping past it an error inside the FMU.
    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Result<Fmi2Res, Fmi2Error>;

    /// Start values applied after this call take part in initialization.
    fn enter_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// Leave initialization. A model-exchange component is in Event Mode afterwards.
    fn exit_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// End the run. Not valid once a call has failed with `Error` or `Fatal`.
    fn terminate(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    fn get_real(
        &mut self,
        vrs: &[fmi2ValueReference],
        values: &mut [fmi2Real],
    ) -> Result<Fmi2Res, Fmi2Error>;

    fn get_integer(
        &mut self,
        vrs: &[fmi2ValueReference],
        values: &mut [fmi2Integer],
    ) -> Result<Fmi2Res, Fmi2Error>;

    fn get_boolean(
        &mut self,
        vrs: &[fmi2ValueReference],
        values: &mut [fmi2Boolean],
    ) -> Result<Fmi2Res, Fmi2Error>;

    /// Owned copies, the component reuses its string buffers between calls.
    fn get_string(&mut self, vrs: &[fmi2ValueReference]) -> Result<Vec<String>, Fmi2Error>;

    /// `vrs` and `values` are paired by position and must have equal length.
    fn set_real(&mut self, vrs: &[fmi2ValueReference], values: &[fmi2Real])
        -> Result<Fmi2Res, Fmi2Error>;

    fn set_integer(
        &mut self,
        vrs: &[fmi2ValueReference],
        values: &[fmi2Integer],
    ) -> Result<Fmi2Res, Fmi2Error>;

    fn set_boolean(
        &mut self,
        vrs: &[fmi2ValueReference],
        values: &[fmi2Boolean],
    ) -> Result<Fmi2Res, Fmi2Error>;

    fn set_string(&mut self, vrs: &[fmi2ValueReference], values: &[&str])
        -> Result<Fmi2Res, Fmi2Error>;
}

/// A model whose continuous states are integrated by the caller.
pub trait ModelExchange: Common {
    /// Leave Continuous-Time Mode to handle a time, state or step event.
    fn enter_event_mode(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// Advance the super-dense time by one event iteration and report the outcome in
    /// `event_flags`. Repeat while `discrete_states_need_update` stays set.
    fn new_discrete_states(&mut self, event_flags: &mut EventFlags) -> Result<Fmi2Res, Fmi2Error>;

    /// Resume integration after event handling.
    fn enter_continuous_time_mode(&mut self) -> Result<Fmi2Res, Fmi2Error>;

    /// Notify the model that an integrator step was accepted.
    ///
    /// Returns `(enter_event_mode, terminate_simulation)`.
    fn completed_integrator_step(
        &mut self,
        no_set_fmu_state_prior_to_current_point: bool,
    ) -> Result<(bool, bool), Fmi2Error>;

    fn set_time(&mut self, time: f64) -> Result<Fmi2Res, Fmi2Error>;

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<Fmi2Res, Fmi2Error>;

    /// Write the state derivatives at the current time and states into `dx`.
    fn get_derivatives(&mut self, dx: &mut [f64]) -> Result<Fmi2Res, Fmi2Error>;

    /// A sign change of any indicator between two steps marks a state event.
    fn get_event_indicators(&mut self, events: &mut [f64]) -> Result<Fmi2Res, Fmi2Error>;

    fn get_continuous_states(&mut self, x: &mut [f64]) -> Result<Fmi2Res, Fmi2Error>;
}

/// A component that carries its own solver and advances in communication steps.
pub trait CoSimulation: Common {
    /// Advance from `current_communication_point` by `communication_step_size`.
    ///
    /// A [`Fmi2Error::Discard`] means the step was cut short; see
    /// [`CoSimulation::last_successful_time`] and [`CoSimulation::terminated`].
    fn do_step(
        &mut self,
        current_communication_point: f64,
        communication_step_size: f64,
        new_step: bool,
    ) -> Result<Fmi2Res, Fmi2Error>;

    /// End of the last step that completed.
    fn last_successful_time(&mut self) -> Result<f64, Fmi2Error>;

    /// Whether the component asked to stop the run.
    fn terminated(&mut self) -> Result<bool, Fmi2Error>;
}
