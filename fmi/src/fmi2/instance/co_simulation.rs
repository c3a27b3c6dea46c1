use crate::fmi2::{Fmi2Error, Fmi2Res};

use super::{binding, traits, Instance, CS};

impl<'a> traits::CoSimulation for Instance<'a, CS> {
    fn do_step(
        &mut self,
        current_communication_point: f64,
        communication_step_size: f64,
        new_step: bool,
    ) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe {
            self.binding.fmi2DoStep(
                self.component,
                current_communication_point,
                communication_step_size,
                new_step as binding::fmi2Boolean,
            )
        })
    }

    fn last_successful_time(&mut self) -> Result<f64, Fmi2Error> {
        let mut time = 0.0;
        Self::check(unsafe {
            self.binding.fmi2GetRealStatus(
                self.component,
                binding::fmi2StatusKind_fmi2LastSuccessfulTime,
                &mut time,
            )
        })?;
        Ok(time)
    }

    fn terminated(&mut self) -> Result<bool, Fmi2Error> {
        let mut flag = binding::fmi2False;
        Self::check(unsafe {
            self.binding.fmi2GetBooleanStatus(
                self.component,
                binding::fmi2StatusKind_fmi2Terminated,
                &mut flag,
            )
        })?;
        Ok(flag != binding::fmi2False)
    }
}
