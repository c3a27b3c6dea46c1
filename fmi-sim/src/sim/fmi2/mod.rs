#[cfg(feature = "cs")]
mod cs;
mod io;
#[cfg(feature = "me")]
mod me;

#[cfg(feature = "cs")]
pub use cs::co_simulation;
#[cfg(feature = "me")]
pub use me::model_exchange;

use fmi::fmi2::{binding, instance::Common};

use crate::Error;

use super::{io::StartValues, traits::InstSetValues, SimState};

impl<Inst> SimState<Inst>
where
    Inst: Common<ValueRef = binding::fmi2ValueReference>,
{
    pub fn apply_start_values(
        &mut self,
        start_values: &StartValues<binding::fmi2ValueReference>,
    ) -> Result<(), Error> {
        for (vr, ary) in &start_values.variables {
            self.inst.set_array(&[*vr], ary)?;
        }
        Ok(())
    }

    /// Set up the experiment, apply the start values and run through Initialization Mode.
    pub fn initialize(
        &mut self,
        start_values: &StartValues<binding::fmi2ValueReference>,
    ) -> Result<(), Error> {
        self.inst.setup_experiment(
            self.sim_params.tolerance,
            self.sim_params.start_time,
            Some(self.sim_params.stop_time),
        )?;

        self.apply_start_values(start_values)?;

        self.inst.enter_initialization_mode()?;
        self.inst.exit_initialization_mode()?;

        Ok(())
    }
}
