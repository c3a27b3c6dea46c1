/// Outcome of one event iteration of a model-exchange component.
#[derive(Default, Debug, PartialEq)]
pub struct EventFlags {
    /// Another iteration is needed before leaving Event Mode.
    pub discrete_states_need_update: bool,
    /// The model wants the run to end.
    pub terminate_simulation: bool,
    /// State scaling changed; integrators relying on it must restart.
    pub nominals_of_continuous_states_changed: bool,
    /// States were re-initialized, so the integrator must restart from the new values.
    pub values_of_continuous_states_changed: bool,
    /// Next scheduled time event, if any.
    pub next_event_time: Option<f64>,
}

impl EventFlags {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[cfg(feature = "fmi2")]
    pub(crate) fn update_from_fmi2_event_info(
        &mut self,
        info: crate::fmi2::binding::fmi2EventInfo,
    ) {
        let set = |flag| flag != crate::fmi2::binding::fmi2False;
        *self = Self {
            discrete_states_need_update: set(info.newDiscreteStatesNeeded),
            terminate_simulation: set(info.terminateSimulation),
            nominals_of_continuous_states_changed: set(info.nominalsOfContinuousStatesChanged),
            values_of_continuous_states_changed: set(info.valuesOfContinuousStatesChanged),
            next_event_time: set(info.nextEventTimeDefined).then_some(info.nextEventTime),
        };
    }
}
