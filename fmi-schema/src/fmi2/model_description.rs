use hard_xml::XmlRead;

use crate::{
    traits::{self, FmiModelDescription},
    Error,
};

use super::{CoSimulation, InterfaceType, ModelExchange, ScalarVariable, Unknown};

#[derive(Default, Debug, XmlRead)]
#[xml(tag = "fmiModelDescription")]
pub struct Fmi2ModelDescription {
    /// Version of FMI (Clarification for FMI 2.0.2: for FMI 2.0.x revisions fmiVersion is defined
    /// as "2.0").
    #[xml(attr = "fmiVersion")]
    pub fmi_version: String,

    /// The name of the model as used in the modeling environment that generated the XML file,
    /// such as Modelica.Mechanics.Rotational.Examples.CoupledClutches.
    #[xml(attr = "modelName")]
    pub model_name: String,

    /// Fingerprint of xml-file content to verify that xml-file and C-functions are compatible to
    /// each other
    #[xml(attr = "guid")]
    pub guid: String,

    #[xml(attr = "description")]
    pub description: Option<String>,

    #[xml(attr = "author")]
    pub author: Option<String>,

    /// Version of FMU, e.g., "1.4.1"
    #[xml(attr = "version")]
    pub version: Option<String>,

    #[xml(attr = "copyright")]
    pub copyright: Option<String>,

    #[xml(attr = "license")]
    pub license: Option<String>,

    /// Name of the tool that generated the XML file.
    #[xml(attr = "generationTool")]
    pub generation_tool: Option<String>,

    #[xml(attr = "generationDateAndTime")]
    pub generation_date_and_time: Option<String>,

    /// Defines whether the variable names in <ModelVariables> and in <TypeDefinitions> follow a
    /// particular convention.
    #[xml(attr = "variableNamingConvention")]
    pub variable_naming_convention: Option<String>,

    #[xml(default, attr = "numberOfEventIndicators")]
    pub number_of_event_indicators: u32,

    /// If present, the FMU is based on FMI for Model Exchange
    #[xml(child = "ModelExchange")]
    pub model_exchange: Option<ModelExchange>,

    /// If present, the FMU is based on FMI for Co-Simulation
    #[xml(child = "CoSimulation")]
    pub co_simulation: Option<CoSimulation>,

    #[xml(child = "LogCategories")]
    pub log_categories: Option<LogCategories>,

    #[xml(child = "DefaultExperiment")]
    pub default_experiment: Option<DefaultExperiment>,

    #[xml(default, child = "ModelVariables")]
    pub model_variables: ModelVariables,

    #[xml(default, child = "ModelStructure")]
    pub model_structure: ModelStructure,
}

impl FmiModelDescription for Fmi2ModelDescription {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn version_string(&self) -> &str {
        &self.fmi_version
    }
}

impl Fmi2ModelDescription {
    pub fn deserialize(xml: &str) -> Result<Self, Error> {
        crate::deserialize(xml)
    }

    /// Total number of variables
    pub fn num_variables(&self) -> usize {
        self.model_variables.variables.len()
    }

    /// Get the number of continuous states (and derivatives)
    pub fn num_states(&self) -> usize {
        self.model_structure.derivatives.unknowns.len()
    }

    pub fn num_event_indicators(&self) -> usize {
        self.number_of_event_indicators as usize
    }

    /// Get a iterator of the ScalarVariables
    pub fn model_variables(&self) -> impl Iterator<Item = &ScalarVariable> {
        self.model_variables.variables.iter()
    }

    /// Look up a variable by its full name.
    pub fn variable(&self, name: &str) -> Result<&ScalarVariable, Error> {
        self.model_variables()
            .find(|var| var.name == name)
            .ok_or_else(|| Error::VariableNotFound(name.to_owned()))
    }

    /// Look up a variable by its 1-based index in `ModelVariables`.
    pub fn variable_by_index(&self, index: u32) -> Result<&ScalarVariable, Error> {
        (index as usize)
            .checked_sub(1)
            .and_then(|idx| self.model_variables.variables.get(idx))
            .ok_or_else(|| {
                Error::Model(format!(
                    "{}: no variable at index {index}",
                    self.model_name
                ))
            })
    }

    /// The variables declared with `causality="output"`, in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = &ScalarVariable> {
        self.model_variables()
            .filter(|var| var.causality == super::Causality::Output)
    }

    /// The continuous-state derivatives listed in the `ModelStructure`.
    pub fn derivatives(&self) -> Result<Vec<&ScalarVariable>, Error> {
        self.model_structure
            .derivatives
            .unknowns
            .iter()
            .map(|unknown| self.variable_by_index(unknown.index))
            .collect()
    }

    /// The interfaces implemented by this FMU, co-simulation first.
    pub fn interfaces(&self) -> Vec<InterfaceType> {
        let mut interfaces = Vec::new();
        if self.co_simulation.is_some() {
            interfaces.push(InterfaceType::CoSimulation);
        }
        if self.model_exchange.is_some() {
            interfaces.push(InterfaceType::ModelExchange);
        }
        interfaces
    }

    /// The `modelIdentifier` used to name the shared library for the given interface.
    pub fn model_identifier(&self, interface: InterfaceType) -> Option<&str> {
        match interface {
            InterfaceType::ModelExchange => self
                .model_exchange
                .as_ref()
                .map(|me| me.model_identifier.as_str()),
            InterfaceType::CoSimulation => self
                .co_simulation
                .as_ref()
                .map(|cs| cs.model_identifier.as_str()),
        }
    }
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "LogCategories")]
pub struct LogCategories {
    #[xml(child = "Category")]
    pub categories: Vec<Category>,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "Category")]
pub struct Category {
    #[xml(attr = "name")]
    pub name: String,

    #[xml(attr = "description")]
    pub description: Option<String>,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "DefaultExperiment")]
pub struct DefaultExperiment {
    #[xml(attr = "startTime")]
    pub start_time: Option<f64>,

    #[xml(attr = "stopTime")]
    pub stop_time: Option<f64>,

    #[xml(attr = "tolerance")]
    pub tolerance: Option<f64>,

    #[xml(attr = "stepSize")]
    pub step_size: Option<f64>,
}

impl traits::DefaultExperiment for DefaultExperiment {
    fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    fn stop_time(&self) -> Option<f64> {
        self.stop_time
    }

    fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    fn step_size(&self) -> Option<f64> {
        self.step_size
    }
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "ModelVariables")]
pub struct ModelVariables {
    #[xml(child = "ScalarVariable")]
    pub variables: Vec<ScalarVariable>,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "ModelStructure")]
pub struct ModelStructure {
    #[xml(default, child = "Outputs")]
    pub outputs: Outputs,

    #[xml(default, child = "Derivatives")]
    pub derivatives: Derivatives,

    #[xml(default, child = "InitialUnknowns")]
    pub initial_unknowns: InitialUnknowns,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "Outputs")]
pub struct Outputs {
    #[xml(child = "Unknown")]
    pub unknowns: Vec<Unknown>,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "Derivatives")]
pub struct Derivatives {
    #[xml(child = "Unknown")]
    pub unknowns: Vec<Unknown>,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "InitialUnknowns")]
pub struct InitialUnknowns {
    #[xml(child = "Unknown")]
    pub unknowns: Vec<Unknown>,
}
