use arrow::{
    array::StringArray,
    compute::{cast_with_options, CastOptions},
    datatypes::Field,
};
use fmi::schema::fmi2::{Fmi2ModelDescription, ScalarVariable};
use itertools::Itertools;

use crate::Error;

use super::{io::StartValues, traits::FmiSchemaBuilder};

fn field(var: &ScalarVariable) -> Field {
    Field::new(&var.name, var.elem.data_type(), false)
}

impl FmiSchemaBuilder for Fmi2ModelDescription {
    type ValueRef = u32;

    fn output_fields(&self, selection: Option<&[String]>) -> Result<Vec<(Field, u32)>, Error> {
        let outputs = match selection {
            Some(names) => names
                .iter()
                .map(|name| self.variable(name).map(|var| (field(var), var.value_reference)))
                .collect::<Result<Vec<_>, _>>()?,
            None => self
                .outputs()
                .map(|var| (field(var), var.value_reference))
                .collect(),
        };

        if outputs.is_empty() {
            return Err(Error::NoOutputs);
        }

        log::debug!(
            "Recording {}",
            outputs.iter().map(|(field, _)| field.name()).join(", ")
        );
        Ok(outputs)
    }

    fn parse_start_values(&self, start_values: &[String]) -> Result<StartValues<u32>, Error> {
        let cast_options = CastOptions {
            safe: false,
            ..Default::default()
        };

        let mut variables = vec![];

        for start_value in start_values {
            let (name, value) = start_value.split_once('=').ok_or_else(|| {
                Error::InvalidStartValue(start_value.clone(), "expected `name=value`".to_owned())
            })?;
            let name = name.trim();

            let var = self.variable(name)?;
            if !var.accepts_start_value() {
                log::warn!(
                    "Variable {name} ({:?}, {:?}) does not accept a start value, setting it anyway",
                    var.causality,
                    var.variability
                );
            }

            let ary = StringArray::from(vec![value.trim()]);
            let ary = cast_with_options(&ary, &var.elem.data_type(), &cast_options)
                .map_err(|e| Error::InvalidStartValue(start_value.clone(), e.to_string()))?;

            log::trace!("Start value {name} = {value}");
            variables.push((var.value_reference, ary));
        }

        Ok(StartValues { variables })
    }
}
