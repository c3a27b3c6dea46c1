//! A simulation master for FMI 2.0 FMUs.
//!
//! The entry point is [`simulate`], which picks the interface according to
//! [`SimOptions::interface`], runs the master algorithm and returns the recorded outputs as an
//! Arrow [`RecordBatch`] whose first column is `time`.
#![doc = document_features::document_features!()]
#![deny(clippy::all)]

use arrow::record_batch::RecordBatch;
use fmi::{
    fmi2::import::Fmi2Import,
    schema::fmi2::InterfaceType,
    traits::FmiImport,
};

pub mod options;
pub mod sim;

pub use options::{Interface, SimOptions, SolverKind};
pub use sim::{solver::SolverError, SimStats};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    FmiError(#[from] fmi::Error),

    #[error(transparent)]
    Fmi2Error(#[from] fmi::fmi2::Fmi2Error),

    #[error(transparent)]
    SchemaError(#[from] fmi::schema::Error),

    #[error(transparent)]
    SolverError(#[from] SolverError),

    #[error(transparent)]
    ArrowError(#[from] arrow::error::ArrowError),

    #[error("Invalid simulation parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid start value `{0}`: {1}")]
    InvalidStartValue(String, String),

    #[error("No output variables selected")]
    NoOutputs,

    #[error("FMU offers none of the enabled interfaces")]
    NoInterface,

    #[error("Simulation timed out at t = {0}")]
    Timeout(f64),
}

/// Simulate an imported FMU with the given options.
pub fn simulate(import: &Fmi2Import, options: &SimOptions) -> Result<RecordBatch, Error> {
    let interface = select_interface(&import.model_description().interfaces(), options.interface)?;
    log::debug!(
        "Simulating {} with {interface}",
        import.model_description().model_name
    );

    match interface {
        #[cfg(feature = "cs")]
        InterfaceType::CoSimulation => sim::fmi2::co_simulation(import, options),
        #[cfg(feature = "me")]
        InterfaceType::ModelExchange => sim::fmi2::model_exchange(import, options),
        #[allow(unreachable_patterns)]
        other => Err(fmi::Error::UnsupportedFmuType(other).into()),
    }
}

/// Resolve the requested interface against those the FMU offers.
fn select_interface(offered: &[InterfaceType], requested: Interface) -> Result<InterfaceType, Error> {
    let enabled = |interface: &InterfaceType| match interface {
        InterfaceType::CoSimulation => cfg!(feature = "cs"),
        InterfaceType::ModelExchange => cfg!(feature = "me"),
    };

    let wanted = match requested {
        Interface::Auto => {
            return offered
                .iter()
                .copied()
                .find(enabled)
                .ok_or(Error::NoInterface);
        }
        Interface::CoSimulation => InterfaceType::CoSimulation,
        Interface::ModelExchange => InterfaceType::ModelExchange,
    };

    if offered.contains(&wanted) && enabled(&wanted) {
        Ok(wanted)
    } else {
        Err(fmi::Error::UnsupportedFmuType(wanted).into())
    }
}
