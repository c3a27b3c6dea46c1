use std::ffi::CStr;

use crate::fmi2 as binding;

unsafe fn str_or_null<'a>(ptr: binding::fmi2String) -> &'a str {
    (!ptr.is_null())
        .then(|| CStr::from_ptr(ptr).to_str().ok())
        .flatten()
        .unwrap_or("NULL")
}

/// Receives messages after `logger.c` has expanded their printf arguments.
#[no_mangle]
extern "C" fn callback_log(
    _component_environment: binding::fmi2ComponentEnvironment,
    instance_name: binding::fmi2String,
    status: binding::fmi2Status,
    category: binding::fmi2String,
    message: binding::fmi2String,
) {
    let instance_name = unsafe { str_or_null(instance_name) };
    let category = unsafe { str_or_null(category) };
    let message = unsafe { str_or_null(message) };

    let level = match status {
        binding::fmi2Status_fmi2OK => log::Level::Info,
        binding::fmi2Status_fmi2Warning => log::Level::Warn,
        binding::fmi2Status_fmi2Discard | binding::fmi2Status_fmi2Pending => log::Level::Debug,
        _ => log::Level::Error,
    };

    log::logger().log(
        &log::Record::builder()
            .args(format_args!("[{category}] {message}"))
            .level(level)
            .module_path(Some("logger"))
            .target(instance_name)
            .build(),
    );
}

#[link(name = "logger", kind = "static")]
extern "C" {
    /// Variadic entry point handed to the FMU as its logger. Defining variadic functions needs
    /// unstable Rust, so this lives in C and forwards to [`callback_log`].
    pub fn callback_logger_handler(
        componentEnvironment: binding::fmi2ComponentEnvironment,
        instanceName: binding::fmi2String,
        status: binding::fmi2Status,
        category: binding::fmi2String,
        message: binding::fmi2String,
        ...
    );
}
