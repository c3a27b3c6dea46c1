//! FMI 2.0 import and instances

pub mod import;
pub mod instance;

pub use fmi_schema::fmi2 as schema;
pub use fmi_sys::fmi2 as binding;

/// Same layout as `fmi2CallbackFunctions`. Log messages are routed into `log`.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CallbackFunctions {
    pub logger: binding::fmi2CallbackLogger,
    pub allocate_memory: binding::fmi2CallbackAllocateMemory,
    pub free_memory: binding::fmi2CallbackFreeMemory,
    pub step_finished: binding::fmi2StepFinished,
    pub component_environment: binding::fmi2ComponentEnvironment,
}

impl Default for CallbackFunctions {
    fn default() -> Self {
        Self {
            logger: Some(binding::logger::callback_logger_handler as _),
            allocate_memory: Some(libc::calloc),
            free_memory: Some(libc::free),
            step_finished: None,
            component_environment: std::ptr::null_mut::<std::os::raw::c_void>(),
        }
    }
}

/// Non-failing outcomes of an FMI call.
#[derive(Debug, PartialEq, Eq)]
pub enum Fmi2Res {
    OK,
    /// Computation continues; details went through the logger callback.
    Warning,
    /// An asynchronous co-simulation step is still running.
    Pending,
}

/// Failing outcomes of an FMI call, plus the failures of calling at all.
#[derive(Debug, thiserror::Error)]
pub enum Fmi2Error {
    /// The call was rejected but the instance is still usable, e.g. a step that must be retried
    /// smaller or a status the component cannot report.
    #[error("Discard")]
    Discard,
    /// This instance is unusable.
    #[error("Error")]
    Error,
    /// Every instance of the model is unusable.
    #[error("Fatal")]
    Fatal,

    #[error("FMU returned an invalid string")]
    InvalidString,

    #[error(transparent)]
    MissingSymbol(#[from] fmi_sys::MissingSymbol),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fmi2Status(pub binding::fmi2Status);

impl Fmi2Status {
    #[inline]
    pub fn ok(self) -> Result<Fmi2Res, Fmi2Error> {
        self.into()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.0 == binding::fmi2Status_fmi2Error || self.0 == binding::fmi2Status_fmi2Fatal
    }
}

impl From<binding::fmi2Status> for Fmi2Status {
    fn from(status: binding::fmi2Status) -> Self {
        Self(status)
    }
}

impl From<Fmi2Status> for Result<Fmi2Res, Fmi2Error> {
    fn from(Fmi2Status(status): Fmi2Status) -> Self {
        match status {
            binding::fmi2Status_fmi2OK => Ok(Fmi2Res::OK),
            binding::fmi2Status_fmi2Warning => Ok(Fmi2Res::Warning),
            binding::fmi2Status_fmi2Pending => Ok(Fmi2Res::Pending),
            binding::fmi2Status_fmi2Discard => Err(Fmi2Error::Discard),
            binding::fmi2Status_fmi2Error => Err(Fmi2Error::Error),
            _ => Err(Fmi2Error::Fatal),
        }
    }
}
