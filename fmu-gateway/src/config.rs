//! Operator configuration of the gateway.

use std::{
    net::SocketAddr,
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::{Parser, ValueEnum};

const DEFAULT_BIND: &str = "127.0.0.1:5001";
const DEFAULT_UPLOAD_LIMIT_MIB: usize = 10;
const DEFAULT_STOP_TIME: f64 = 10.0;
const DEFAULT_OUTPUT_INTERVAL: f64 = 1.0 / 60.0;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_OUTPUTS: [&str; 3] = ["body1.r_0[1]", "body1.r_0[2]", "body1.r_0[3]"];
const DEFAULT_MASS_VARIABLE: &str = "body1.m";
const DEFAULT_STIFFNESS_VARIABLE: &str = "body1.frame_a.r_0[2]";

/// How a `parameters` form field that cannot be used is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ParametersMode {
    /// Reject malformed overrides with a client error
    Strict,
    /// Treat malformed JSON as if no overrides were given
    #[default]
    Lenient,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "fmu-gateway", version)]
#[command(about = "HTTP gateway that simulates uploaded FMUs")]
pub struct GatewayConfig {
    /// Address to listen on
    #[arg(long, env = "FMU_GATEWAY_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Directory for uploaded packages [default: the system temporary directory]
    #[arg(long, env = "FMU_GATEWAY_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Maximum size of a request body in MiB
    #[arg(long, env = "FMU_GATEWAY_UPLOAD_LIMIT_MIB", default_value_t = DEFAULT_UPLOAD_LIMIT_MIB)]
    pub upload_limit_mib: usize,

    /// Simulation stop time in seconds
    #[arg(long, env = "FMU_GATEWAY_STOP_TIME", default_value_t = DEFAULT_STOP_TIME)]
    pub stop_time: f64,

    /// Interval between output samples in seconds
    #[arg(long, env = "FMU_GATEWAY_OUTPUT_INTERVAL", default_value_t = DEFAULT_OUTPUT_INTERVAL)]
    pub output_interval: f64,

    /// Wall-clock limit for a single simulation in seconds
    #[arg(long, env = "FMU_GATEWAY_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Output variable to record, can be given multiple times
    #[arg(
        long = "output",
        env = "FMU_GATEWAY_OUTPUTS",
        value_delimiter = ',',
        default_values = DEFAULT_OUTPUTS
    )]
    pub outputs: Vec<String>,

    /// Record the outputs declared by the uploaded model instead of `--output`
    #[arg(long, env = "FMU_GATEWAY_DECLARED_OUTPUTS", default_value_t = false)]
    pub declared_outputs: bool,

    /// Model variable receiving the `mass` override
    #[arg(long, env = "FMU_GATEWAY_MASS_VARIABLE", default_value = DEFAULT_MASS_VARIABLE)]
    pub mass_variable: String,

    /// Model variable receiving the `stiffness` override
    #[arg(long, env = "FMU_GATEWAY_STIFFNESS_VARIABLE", default_value = DEFAULT_STIFFNESS_VARIABLE)]
    pub stiffness_variable: String,

    /// Handling of a `parameters` field that is not a usable JSON object
    #[arg(long, env = "FMU_GATEWAY_PARAMETERS_MODE", value_enum, default_value_t = ParametersMode::Lenient)]
    pub parameters_mode: ParametersMode,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5001)),
            work_dir: None,
            upload_limit_mib: DEFAULT_UPLOAD_LIMIT_MIB,
            stop_time: DEFAULT_STOP_TIME,
            output_interval: DEFAULT_OUTPUT_INTERVAL,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            outputs: DEFAULT_OUTPUTS.map(String::from).to_vec(),
            declared_outputs: false,
            mass_variable: DEFAULT_MASS_VARIABLE.to_owned(),
            stiffness_variable: DEFAULT_STIFFNESS_VARIABLE.to_owned(),
            parameters_mode: ParametersMode::Lenient,
        }
    }
}

impl GatewayConfig {
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn upload_limit(&self) -> usize {
        self.upload_limit_mib.saturating_mul(1024 * 1024)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Wall-clock deadline of a simulation starting now, `None` if it lies beyond what
    /// `Instant` can represent.
    pub fn deadline(&self) -> Option<Instant> {
        Instant::now().checked_add(self.timeout())
    }

    /// The output selection handed to the engine, `None` for the model's declared outputs.
    pub fn output_selection(&self) -> Option<Vec<String>> {
        (!self.declared_outputs).then(|| self.outputs.clone())
    }
}
