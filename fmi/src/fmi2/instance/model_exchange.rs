use crate::{
    fmi2::{Fmi2Error, Fmi2Res},
    EventFlags,
};

use super::{binding, traits, Instance, ME};

fn is_set(flag: binding::fmi2Boolean) -> bool {
    flag != binding::fmi2False
}

impl<'a> traits::ModelExchange for Instance<'a, ME> {
    fn enter_event_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe { self.binding.fmi2EnterEventMode(self.component) })
    }

    fn new_discrete_states(&mut self, event_flags: &mut EventFlags) -> Result<Fmi2Res, Fmi2Error> {
        let mut info = binding::fmi2EventInfo::default();
        let res = Self::check(unsafe {
            self.binding
                .fmi2NewDiscreteStates(self.component, &mut info)
        })?;
        event_flags.update_from_fmi2_event_info(info);
        Ok(res)
    }

    fn enter_continuous_time_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe { self.binding.fmi2EnterContinuousTimeMode(self.component) })
    }

    fn completed_integrator_step(
        &mut self,
        no_set_fmu_state_prior_to_current_point: bool,
    ) -> Result<(bool, bool), Fmi2Error> {
        let mut flags = [binding::fmi2False; 2];
        let [enter_event_mode, terminate_simulation] = &mut flags;
        Self::check(unsafe {
            self.binding.fmi2CompletedIntegratorStep(
                self.component,
                no_set_fmu_state_prior_to_current_point as binding::fmi2Boolean,
                enter_event_mode,
                terminate_simulation,
            )
        })?;
        Ok((is_set(flags[0]), is_set(flags[1])))
    }

    fn set_time(&mut self, time: f64) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe { self.binding.fmi2SetTime(self.component, time) })
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe {
            self.binding
                .fmi2SetContinuousStates(self.component, states.as_ptr(), states.len())
        })
    }

    fn get_derivatives(&mut self, dx: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe {
            self.binding
                .fmi2GetDerivatives(self.component, dx.as_mut_ptr(), dx.len())
        })
    }

    fn get_event_indicators(&mut self, events: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe {
            self.binding
                .fmi2GetEventIndicators(self.component, events.as_mut_ptr(), events.len())
        })
    }

    fn get_continuous_states(&mut self, x: &mut [f64]) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe {
            self.binding
                .fmi2GetContinuousStates(self.component, x.as_mut_ptr(), x.len())
        })
    }
}
