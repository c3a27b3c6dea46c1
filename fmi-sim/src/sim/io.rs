use std::sync::Arc;

use arrow::{
    array::{make_builder, ArrayBuilder, ArrayRef, Float64Builder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use fmi::traits::FmiInstance;

use super::params::SimParams;

/// Start values resolved to value references, one single-element array each.
#[derive(Debug)]
pub struct StartValues<VR> {
    pub variables: Vec<(VR, ArrayRef)>,
}

pub struct Recorder<Inst: FmiInstance> {
    pub(crate) field: Field,
    pub(crate) value_reference: Inst::ValueRef,
    pub(crate) builder: Box<dyn ArrayBuilder>,
}

pub struct RecorderState<Inst: FmiInstance> {
    pub(crate) time: Float64Builder,
    pub(crate) recorders: Vec<Recorder<Inst>>,
}

impl<Inst: FmiInstance> RecorderState<Inst> {
    /// Reserve one column per `(Field, ValueReference)` output, sized for the whole run.
    pub fn new(
        outputs: impl IntoIterator<Item = (Field, Inst::ValueRef)>,
        sim_params: &SimParams,
    ) -> Self {
        let num_points = sim_params.num_steps() + 1;

        let time = Float64Builder::with_capacity(num_points);

        let recorders = outputs
            .into_iter()
            .map(|(field, vr)| {
                let builder = make_builder(field.data_type(), num_points);
                Recorder {
                    field,
                    value_reference: vr,
                    builder,
                }
            })
            .collect();

        Self { time, recorders }
    }

    /// Close the recording into a batch with `time` as its first column.
    pub fn finish(mut self) -> Result<RecordBatch, arrow::error::ArrowError> {
        let mut fields = vec![Field::new("time", DataType::Float64, false)];
        let mut columns: Vec<ArrayRef> = vec![Arc::new(self.time.finish())];
        for mut recorder in self.recorders {
            fields.push(recorder.field);
            columns.push(recorder.builder.finish());
        }
        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
    }
}
