use arrow::{array::ArrayRef, datatypes::Field};
use fmi::traits::FmiInstance;

use crate::Error;

use super::{
    io::{RecorderState, StartValues},
    solver::Solver,
    SimStats,
};

/// Interface for building the Arrow fields for the recorded variables and start values of an FMU.
pub trait FmiSchemaBuilder {
    type ValueRef;

    /// Resolve the recorded variables into a list of (Field, ValueReference).
    ///
    /// `None` selects the variables declared with `causality="output"`. An explicit selection is
    /// validated against the model and keeps its order.
    fn output_fields(
        &self,
        selection: Option<&[String]>,
    ) -> Result<Vec<(Field, Self::ValueRef)>, Error>;

    /// Parse a list of "var=value" strings, casting each value to the variable's type.
    fn parse_start_values(&self, start_values: &[String])
        -> Result<StartValues<Self::ValueRef>, Error>;
}

pub trait InstSetValues: FmiInstance {
    fn set_array(&mut self, vrs: &[Self::ValueRef], values: &ArrayRef) -> Result<(), Error>;
}

pub trait InstRecordValues: FmiInstance + Sized {
    fn record_outputs(
        &mut self,
        time: f64,
        recorder: &mut RecorderState<Self>,
    ) -> Result<(), Error>;
}

pub trait SimCs {
    /// Main loop of the co-simulation
    fn main_loop(&mut self) -> Result<SimStats, Error>;
}

pub trait SimHandleEvents {
    /// Run the event iteration of a model in Event Mode.
    ///
    /// Returns `(reset_solver, terminate)`.
    fn handle_events(&mut self, time: f64) -> Result<(bool, bool), Error>;
}

pub trait SimMe<Inst> {
    /// Main loop of the model-exchange simulation, starting in Continuous-Time Mode.
    fn main_loop<S: Solver<Inst>>(&mut self, solver: S) -> Result<SimStats, Error>;
}
