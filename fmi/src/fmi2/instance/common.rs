use std::ffi::{CStr, CString};

use crate::{
    fmi2::{binding, Fmi2Error, Fmi2Res},
    traits::InstanceTag,
};

use super::{traits, Instance};

/// Borrow a string returned by the FMU.
///
/// # Safety
/// `ptr` must be null or point to a nul-terminated string that lives as long as `'s`.
unsafe fn fmu_str<'s>(ptr: *const std::os::raw::c_char) -> Result<&'s str, Fmi2Error> {
    if ptr.is_null() {
        return Err(Fmi2Error::InvalidString);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| Fmi2Error::InvalidString)
}

fn c_strings(values: &[&str]) -> Result<Vec<CString>, Fmi2Error> {
    values
        .iter()
        .map(|value| CString::new(*value).map_err(|_| Fmi2Error::InvalidString))
        .collect()
}

/// Fill `values` from the variables in `vrs` through `fmi2Get<Type>`.
macro_rules! getter {
    ($method:ident, $symbol:ident, $ty:ty) => {
        fn $method(
            &mut self,
            vrs: &[binding::fmi2ValueReference],
            values: &mut [$ty],
        ) -> Result<Fmi2Res, Fmi2Error> {
            debug_assert_eq!(vrs.len(), values.len());
            let len = vrs.len().min(values.len());
            Self::check(unsafe {
                self.binding
                    .$symbol(self.component, vrs.as_ptr(), len, values.as_mut_ptr())
            })
        }
    };
}

/// Write `values` into the variables in `vrs` through `fmi2Set<Type>`.
macro_rules! setter {
    ($method:ident, $symbol:ident, $ty:ty) => {
        fn $method(
            &mut self,
            vrs: &[binding::fmi2ValueReference],
            values: &[$ty],
        ) -> Result<Fmi2Res, Fmi2Error> {
            debug_assert_eq!(vrs.len(), values.len());
            let len = vrs.len().min(values.len());
            Self::check(unsafe {
                self.binding
                    .$symbol(self.component, vrs.as_ptr(), len, values.as_ptr())
            })
        }
    };
}

impl<'a, Tag: InstanceTag> traits::Common for Instance<'a, Tag> {
    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Result<Fmi2Res, Fmi2Error> {
        let defined = |value: Option<f64>| {
            (value.is_some() as binding::fmi2Boolean, value.unwrap_or_default())
        };
        let (tolerance_defined, tolerance) = defined(tolerance);
        let (stop_time_defined, stop_time) = defined(stop_time);
        Self::check(unsafe {
            self.binding.fmi2SetupExperiment(
                self.component,
                tolerance_defined,
                tolerance,
                start_time,
                stop_time_defined,
                stop_time,
            )
        })
    }

    fn enter_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe { self.binding.fmi2EnterInitializationMode(self.component) })
    }

    fn exit_initialization_mode(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe { self.binding.fmi2ExitInitializationMode(self.component) })
    }

    fn terminate(&mut self) -> Result<Fmi2Res, Fmi2Error> {
        Self::check(unsafe { self.binding.fmi2Terminate(self.component) })
    }

    getter!(get_real, fmi2GetReal, binding::fmi2Real);
    getter!(get_integer, fmi2GetInteger, binding::fmi2Integer);
    getter!(get_boolean, fmi2GetBoolean, binding::fmi2Boolean);

    fn get_string(&mut self, vrs: &[binding::fmi2ValueReference]) -> Result<Vec<String>, Fmi2Error> {
        let mut ptrs: Vec<binding::fmi2String> = vec![std::ptr::null(); vrs.len()];
        Self::check(unsafe {
            self.binding
                .fmi2GetString(self.component, vrs.as_ptr(), vrs.len(), ptrs.as_mut_ptr())
        })?;
        // Valid only until the next call into the component
        ptrs.into_iter()
            .map(|ptr| unsafe { fmu_str(ptr) }.map(str::to_owned))
            .collect()
    }

    setter!(set_real, fmi2SetReal, binding::fmi2Real);
    setter!(set_integer, fmi2SetInteger, binding::fmi2Integer);
    setter!(set_boolean, fmi2SetBoolean, binding::fmi2Boolean);

    fn set_string(
        &mut self,
        vrs: &[binding::fmi2ValueReference],
        values: &[&str],
    ) -> Result<Fmi2Res, Fmi2Error> {
        debug_assert_eq!(vrs.len(), values.len());
        let owned = c_strings(values)?;
        let ptrs = owned.iter().map(|value| value.as_ptr()).collect::<Vec<_>>();
        let len = vrs.len().min(ptrs.len());
        Self::check(unsafe {
            self.binding
                .fmi2SetString(self.component, vrs.as_ptr(), len, ptrs.as_ptr())
        })
    }
}
