use std::{fmt::Display, time::Instant};

/// Which FMI interface to simulate with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interface {
    /// Co-Simulation when the FMU offers it, Model-Exchange otherwise
    #[default]
    Auto,
    /// Perform a ModelExchange simulation
    ModelExchange,
    /// Perform a CoSimulation simulation
    CoSimulation,
}

impl Display for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::ModelExchange => write!(f, "ModelExchange"),
            Self::CoSimulation => write!(f, "CoSimulation"),
        }
    }
}

/// Integration method used for Model-Exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SolverKind {
    /// Forward Euler
    Euler,
    /// Classical fourth-order Runge-Kutta
    #[default]
    Rk4,
}

/// Options for a single simulation run.
///
/// Every `None` falls back to the model's `DefaultExperiment`, and then to the built-in
/// defaults (start `0`, stop `1`, 500 output intervals).
#[derive(Debug, Clone, Default)]
pub struct SimOptions {
    /// Start time of the simulation
    pub start_time: Option<f64>,
    /// Stop time of the simulation
    pub stop_time: Option<f64>,
    /// Output interval
    pub output_interval: Option<f64>,
    /// Maximum step size of the Model-Exchange solver. Defaults to the output interval.
    pub step_size: Option<f64>,
    /// Relative tolerance passed to `fmi2SetupExperiment`
    pub tolerance: Option<f64>,
    /// Interface to simulate with
    pub interface: Interface,
    /// Solver for Model-Exchange
    pub solver: SolverKind,
    /// Variables to record. `None` records the model's declared outputs.
    pub outputs: Option<Vec<String>>,
    /// List of initial values, as `name=value` strings
    pub initial_values: Vec<String>,
    /// Abort the simulation once this instant has passed
    pub deadline: Option<Instant>,
}
