//! Components created from an [`Fmi2Import`].

use std::ffi::CString;

use crate::{
    traits::{FmiImport, FmiInstance, InstanceTag},
    Error, InterfaceType,
};

use super::{binding, import::Fmi2Import, schema, CallbackFunctions, Fmi2Error, Fmi2Res, Fmi2Status};

mod co_simulation;
mod common;
mod model_exchange;
mod traits;

pub use crate::{CS, ME};
pub use traits::{CoSimulation, Common, ModelExchange};

pub type InstanceME<'a> = Instance<'a, ME>;
pub type InstanceCS<'a> = Instance<'a, CS>;

/// A component of the library selected by `Tag`, freed on drop.
///
/// Borrowing the import keeps the extracted library on disk for the component's lifetime.
pub struct Instance<'a, Tag> {
    name: String,
    binding: binding::Fmi2Binding,
    component: binding::fmi2Component,
    model_description: &'a schema::Fmi2ModelDescription,
    // The component keeps a pointer to this
    #[allow(dead_code)]
    callbacks: Box<CallbackFunctions>,
    _tag: std::marker::PhantomData<Tag>,
}

impl<'a, Tag> Drop for Instance<'a, Tag> {
    fn drop(&mut self) {
        log::trace!("Freeing component {:?}", self.component);
        if let Err(err) = unsafe { self.binding.fmi2FreeInstance(self.component) } {
            log::warn!("Leaking component of {}: {err}", self.name);
        }
    }
}

impl<'a, Tag: InstanceTag> FmiInstance for Instance<'a, Tag> {
    type ModelDescription = schema::Fmi2ModelDescription;
    type ValueRef = <Fmi2Import as FmiImport>::ValueRef;

    fn name(&self) -> &str {
        &self.name
    }

    fn interface_type(&self) -> InterfaceType {
        Tag::TYPE
    }

    fn model_description(&self) -> &Self::ModelDescription {
        self.model_description
    }
}

impl<'a, Tag> Instance<'a, Tag> {
    /// Status of a call through the function table.
    #[inline]
    fn check(
        status: Result<binding::fmi2Status, fmi_sys::MissingSymbol>,
    ) -> Result<Fmi2Res, Fmi2Error> {
        Fmi2Status(status?).ok()
    }
}

impl<'a, Tag: InstanceTag> Instance<'a, Tag> {
    /// Load the library for `Tag`'s interface and call `fmi2Instantiate`.
    pub fn new(
        import: &'a Fmi2Import,
        instance_name: &str,
        visible: bool,
        logging_on: bool,
    ) -> Result<Self, Error> {
        let schema = import.model_description();
        let model_identifier = schema
            .model_identifier(Tag::TYPE)
            .ok_or(Error::UnsupportedFmuType(Tag::TYPE))?;
        let binding = import.binding(model_identifier)?;
        let callbacks = Box::<CallbackFunctions>::default();

        let name = instance_name.to_owned();
        let instance_name = CString::new(instance_name)?;
        let guid = CString::new(schema.guid.as_bytes())?;
        let resource_url = CString::new(import.canonical_resource_path_string()?)?;

        let fmu_type = match Tag::TYPE {
            InterfaceType::ModelExchange => binding::fmi2Type_fmi2ModelExchange,
            InterfaceType::CoSimulation => binding::fmi2Type_fmi2CoSimulation,
        };

        let functions = &*callbacks as *const CallbackFunctions;
        let component = unsafe {
            binding.fmi2Instantiate(
                instance_name.as_ptr(),
                fmu_type,
                guid.as_ptr(),
                resource_url.as_ptr(),
                functions.cast(),
                visible as binding::fmi2Boolean,
                logging_on as binding::fmi2Boolean,
            )
        }
        .map_err(super::Fmi2Error::from)?;
        if component.is_null() {
            return Err(Error::Instantiation);
        }
        log::trace!("Instantiated {} component {component:?} as {name}", Tag::TYPE);

        Ok(Self {
            name,
            binding,
            component,
            model_description: schema,
            callbacks,
            _tag: std::marker::PhantomData,
        })
    }
}
