//! Row-oriented JSON packaging of a simulation result.

use anyhow::{bail, Context};
use arrow::{
    array::{Array, ArrayRef, AsArray},
    datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type},
    record_batch::RecordBatch,
};
use serde::Serialize;
use serde_json::{Map, Value};

const TIME: &str = "time";
const TRAJECTORY_ID: &str = "simulation_trajectory";
const TRAJECTORY_TYPE: &str = "trajectory";

/// The success response of `POST /api/simulate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub objects: Vec<SimulationObject>,
    pub time_range: [f64; 2],
    pub variables: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SimulationObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<Map<String, Value>>,
}

impl Envelope {
    /// Package a batch whose first column is `time`.
    ///
    /// Rows list the outputs in column order followed by `time`, and so does `variables`.
    pub fn from_batch(batch: &RecordBatch) -> anyhow::Result<Self> {
        let schema = batch.schema();
        let time_index = schema
            .index_of(TIME)
            .context("Simulation result has no time column")?;
        let time = batch
            .column(time_index)
            .as_primitive_opt::<Float64Type>()
            .context("Simulation time is not a Float64 column")?;
        if time.is_empty() {
            bail!("Simulation produced no samples");
        }

        let mut variables = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != time_index)
            .map(|(_, field)| field.name().clone())
            .collect::<Vec<_>>();
        variables.push(TIME.to_owned());

        let columns = variables
            .iter()
            .map(|name| {
                let column = batch
                    .column_by_name(name)
                    .with_context(|| format!("Missing column {name}"))?;
                json_values(column).with_context(|| format!("Converting column {name}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let data = (0..batch.num_rows())
            .map(|row| {
                variables
                    .iter()
                    .zip(&columns)
                    .map(|(name, values)| (name.clone(), values[row].clone()))
                    .collect::<Map<_, _>>()
            })
            .collect();

        Ok(Self {
            objects: vec![SimulationObject {
                id: TRAJECTORY_ID.to_owned(),
                kind: TRAJECTORY_TYPE.to_owned(),
                data,
            }],
            time_range: [time.value(0), time.value(time.len() - 1)],
            variables,
        })
    }
}

/// Convert a column into JSON scalars. Nulls and non-finite floats become `null`.
fn json_values(column: &ArrayRef) -> anyhow::Result<Vec<Value>> {
    fn collect<T>(values: impl Iterator<Item = Option<T>>) -> Vec<Value>
    where
        Value: From<T>,
    {
        values.map(|value| value.map_or(Value::Null, Value::from)).collect()
    }

    let values = match column.data_type() {
        DataType::Float64 => collect(column.as_primitive::<Float64Type>().iter()),
        DataType::Float32 => collect(column.as_primitive::<Float32Type>().iter()),
        DataType::Int32 => collect(column.as_primitive::<Int32Type>().iter()),
        DataType::Int64 => collect(column.as_primitive::<Int64Type>().iter()),
        DataType::Boolean => collect(column.as_boolean().iter()),
        DataType::Utf8 => collect(column.as_string::<i32>().iter()),
        dt => bail!("Unsupported data type {dt}"),
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{BooleanArray, Float64Array, Int32Array},
        datatypes::{Field, Schema},
    };
    use serde_json::json;

    use super::*;

    fn batch(columns: Vec<(&str, ArrayRef)>) -> RecordBatch {
        let schema = Schema::new(
            columns
                .iter()
                .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
                .collect::<Vec<_>>(),
        );
        RecordBatch::try_new(
            Arc::new(schema),
            columns.into_iter().map(|(_, array)| array).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_envelope() {
        let batch = batch(vec![
            ("time", Arc::new(Float64Array::from(vec![0.0, 0.5, 1.0])) as ArrayRef),
            ("body1.r_0[2]", Arc::new(Float64Array::from(vec![0.5, 0.25, f64::NAN])) as ArrayRef),
            ("count", Arc::new(Int32Array::from(vec![1, 2, 3])) as ArrayRef),
            ("enabled", Arc::new(BooleanArray::from(vec![true, false, true])) as ArrayRef),
        ]);

        let envelope = Envelope::from_batch(&batch).unwrap();
        assert_eq!(envelope.time_range, [0.0, 1.0]);
        assert_eq!(envelope.variables, ["body1.r_0[2]", "count", "enabled", "time"]);

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["timeRange"], json!([0.0, 1.0]));
        assert_eq!(value["objects"][0]["id"], "simulation_trajectory");
        assert_eq!(value["objects"][0]["type"], "trajectory");
        assert_eq!(
            value["objects"][0]["data"][1],
            json!({"body1.r_0[2]": 0.25, "count": 2, "enabled": false, "time": 0.5})
        );
        assert_eq!(value["objects"][0]["data"][2]["body1.r_0[2]"], Value::Null);

        // Keys keep the column order
        let keys = envelope.objects[0].data[0].keys().collect::<Vec<_>>();
        assert_eq!(keys, ["body1.r_0[2]", "count", "enabled", "time"]);
    }

    #[test]
    fn test_empty() {
        let batch = batch(vec![
            ("time", Arc::new(Float64Array::from(Vec::<f64>::new())) as ArrayRef),
            ("x", Arc::new(Float64Array::from(Vec::<f64>::new())) as ArrayRef),
        ]);
        assert!(Envelope::from_batch(&batch).is_err());
    }

    #[test]
    fn test_no_time() {
        let batch = batch(vec![("x", Arc::new(Float64Array::from(vec![1.0])) as ArrayRef)]);
        let err = Envelope::from_batch(&batch).unwrap_err();
        assert_eq!(err.to_string(), "Simulation result has no time column");
    }
}
