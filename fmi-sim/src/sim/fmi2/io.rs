//! FMI2-specific input and output implementation

use arrow::{
    array::{
        ArrayBuilder, ArrayRef, AsArray, BooleanBuilder, Float64Builder, Int32Builder,
        StringBuilder,
    },
    datatypes::{DataType, Float64Type, Int32Type},
    error::ArrowError,
};
use fmi::fmi2::{binding, instance::Common};
use itertools::Itertools;

use crate::{
    sim::{
        io::Recorder,
        traits::{InstRecordValues, InstSetValues},
        RecorderState,
    },
    Error,
};

fn downcast_builder<B: ArrayBuilder>(builder: &mut Box<dyn ArrayBuilder>) -> Result<&mut B, Error> {
    builder.as_any_mut().downcast_mut::<B>().ok_or_else(|| {
        ArrowError::CastError(format!("column is not {}", std::any::type_name::<B>())).into()
    })
}

macro_rules! impl_recorder {
    ($getter:ident, $builder_type:ident, $inst:expr, $vr:ident, $builder:ident) => {{
        let mut value = [Default::default()];
        $inst.$getter(&[*$vr], &mut value)?;
        downcast_builder::<$builder_type>($builder)?.append_value(value[0]);
    }};
}

impl<Inst> InstRecordValues for Inst
where
    Inst: Common<ValueRef = binding::fmi2ValueReference>,
{
    fn record_outputs(
        &mut self,
        time: f64,
        recorder: &mut RecorderState<Self>,
    ) -> Result<(), Error> {
        log::trace!("Recording variables at time {time}");

        recorder.time.append_value(time);
        for Recorder {
            field,
            value_reference: vr,
            builder,
        } in &mut recorder.recorders
        {
            match field.data_type() {
                DataType::Boolean => {
                    let mut value = [binding::fmi2False];
                    self.get_boolean(&[*vr], &mut value)?;
                    downcast_builder::<BooleanBuilder>(builder)?
                        .append_value(value[0] != binding::fmi2False);
                }
                DataType::Int32 => {
                    impl_recorder!(get_integer, Int32Builder, self, vr, builder)
                }
                DataType::Float64 => {
                    impl_recorder!(get_real, Float64Builder, self, vr, builder)
                }
                DataType::Utf8 => {
                    let values = self.get_string(&[*vr])?;
                    downcast_builder::<StringBuilder>(builder)?
                        .append_value(values.first().map(String::as_str).unwrap_or_default());
                }
                dt => {
                    return Err(ArrowError::NotYetImplemented(format!(
                        "recording {dt} variables"
                    ))
                    .into())
                }
            }
        }
        Ok(())
    }
}

impl<Inst> InstSetValues for Inst
where
    Inst: Common<ValueRef = binding::fmi2ValueReference>,
{
    fn set_array(&mut self, vrs: &[Self::ValueRef], values: &ArrayRef) -> Result<(), Error> {
        match values.data_type() {
            DataType::Boolean => {
                let values = values
                    .as_boolean()
                    .iter()
                    .map(|x| binding::fmi2Boolean::from(x.unwrap_or_default()))
                    .collect_vec();
                self.set_boolean(vrs, &values)?;
            }
            DataType::Int32 => {
                self.set_integer(vrs, values.as_primitive::<Int32Type>().values())?;
            }
            DataType::Float64 => {
                self.set_real(vrs, values.as_primitive::<Float64Type>().values())?;
            }
            DataType::Utf8 => {
                let values = values
                    .as_string::<i32>()
                    .iter()
                    .map(Option::unwrap_or_default)
                    .collect_vec();
                self.set_string(vrs, &values)?;
            }
            dt => {
                return Err(ArrowError::NotYetImplemented(format!("setting {dt} variables")).into())
            }
        }
        Ok(())
    }
}
