use std::str::FromStr;

use hard_xml::XmlRead;

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum Causality {
    Parameter,
    CalculatedParameter,
    Input,
    Output,
    #[default]
    Local,
    Independent,
}

impl FromStr for Causality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parameter" => Ok(Causality::Parameter),
            "calculatedParameter" => Ok(Causality::CalculatedParameter),
            "input" => Ok(Causality::Input),
            "output" => Ok(Causality::Output),
            "local" => Ok(Causality::Local),
            "independent" => Ok(Causality::Independent),
            _ => Err(format!("Invalid Causality: {}", s)),
        }
    }
}

/// Enumeration that defines the time dependency of the variable, in other words it defines the
/// time instants when a variable can change its value.
///
/// The default is [`Variability::Continuous`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum Variability {
    /// The value of the variable never changes.
    Constant,
    /// The value of the variable is fixed after initialization, in other words after
    /// `exit_initialization_mode()` was called the variable value does not change anymore.
    Fixed,
    /// The value of the variable is constant between external events (ModelExchange) and between
    /// Communication Points (CoSimulation) due to changing variables with causality = "parameter"
    /// or "input" and variability = "tunable".
    Tunable,
    /// * ModelExchange: The value of the variable is constant between external and internal
    ///   events (= time, state, step events defined implicitly in the FMU).
    /// * CoSimulation: By convention, the variable is from a "real" sampled data system and its
    ///   value is only changed at Communication Points (also inside the slave).
    Discrete,
    /// Only a variable of type = "Real" can be "continuous".
    #[default]
    Continuous,
}

impl FromStr for Variability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(Variability::Constant),
            "fixed" => Ok(Variability::Fixed),
            "tunable" => Ok(Variability::Tunable),
            "discrete" => Ok(Variability::Discrete),
            "continuous" => Ok(Variability::Continuous),
            _ => Err(format!("Invalid Variability: {}", s)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Initial {
    Exact,
    Approx,
    Calculated,
}

impl FromStr for Initial {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Initial::Exact),
            "approx" => Ok(Initial::Approx),
            "calculated" => Ok(Initial::Calculated),
            _ => Err(format!("Invalid Initial: {}", s)),
        }
    }
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "Real")]
pub struct Real {
    /// If present, name of type defined with TypeDefinitions / SimpleType providing defaults.
    #[xml(attr = "declaredType")]
    pub declared_type: Option<String>,

    #[xml(attr = "unit")]
    pub unit: Option<String>,

    /// Value before initialization, if initial=exact or approx.
    /// max >= start >= min required
    #[xml(attr = "start")]
    pub start: Option<f64>,

    /// If present, this variable is the derivative of variable with ScalarVariable index
    /// "derivative".
    #[xml(attr = "derivative")]
    pub derivative: Option<u32>,

    /// Only for ModelExchange and if variable is a continuous-time state:
    /// If true, state can be reinitialized at an event by the FMU
    /// If false, state will never be reinitialized at an event by the FMU
    #[xml(default, attr = "reinit")]
    pub reinit: bool,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "Integer")]
pub struct Integer {
    #[xml(attr = "declaredType")]
    pub declared_type: Option<String>,

    #[xml(attr = "start")]
    pub start: Option<i32>,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "Boolean")]
pub struct Boolean {
    #[xml(attr = "declaredType")]
    pub declared_type: Option<String>,

    #[xml(attr = "start")]
    pub start: Option<bool>,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "String")]
pub struct StringVariable {
    #[xml(attr = "declaredType")]
    pub declared_type: Option<String>,

    #[xml(attr = "start")]
    pub start: Option<String>,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "Enumeration")]
pub struct Enumeration {
    /// Name of the type defined with TypeDefinitions / SimpleType.
    #[xml(attr = "declaredType")]
    pub declared_type: String,

    #[xml(attr = "start")]
    pub start: Option<i32>,
}

#[derive(Clone, PartialEq, Debug, XmlRead)]
pub enum ScalarVariableElement {
    #[xml(tag = "Real")]
    Real(Real),
    #[xml(tag = "Integer")]
    Integer(Integer),
    #[xml(tag = "Boolean")]
    Boolean(Boolean),
    #[xml(tag = "String")]
    String(StringVariable),
    #[xml(tag = "Enumeration")]
    Enumeration(Enumeration),
}

impl Default for ScalarVariableElement {
    fn default() -> Self {
        Self::Real(Real::default())
    }
}

#[cfg(feature = "arrow")]
impl ScalarVariableElement {
    pub fn data_type(&self) -> arrow::datatypes::DataType {
        match self {
            ScalarVariableElement::Real(_) => arrow::datatypes::DataType::Float64,
            ScalarVariableElement::Integer(_) => arrow::datatypes::DataType::Int32,
            ScalarVariableElement::Boolean(_) => arrow::datatypes::DataType::Boolean,
            ScalarVariableElement::String(_) => arrow::datatypes::DataType::Utf8,
            ScalarVariableElement::Enumeration(_) => arrow::datatypes::DataType::Int32,
        }
    }
}

#[derive(Default, Clone, Debug, PartialEq, XmlRead)]
#[xml(tag = "ScalarVariable")]
pub struct ScalarVariable {
    /// The full, unique name of the variable.
    #[xml(attr = "name")]
    pub name: String,

    /// A handle of the variable to efficiently identify the variable value in the model interface.
    #[xml(attr = "valueReference")]
    pub value_reference: u32,

    /// An optional description string describing the meaning of the variable.
    #[xml(attr = "description")]
    pub description: Option<String>,

    /// Enumeration that defines the causality of the variable.
    #[xml(default, attr = "causality")]
    pub causality: Causality,

    #[xml(default, attr = "variability")]
    pub variability: Variability,

    /// Enumeration that defines how the variable is initialized. It is not allowed to provide a
    /// value for initial if `causality`=`Input` or `Independent`.
    #[xml(attr = "initial")]
    pub initial: Option<Initial>,

    #[xml(
        child = "Real",
        child = "Integer",
        child = "Boolean",
        child = "String",
        child = "Enumeration"
    )]
    pub elem: ScalarVariableElement,
}

impl ScalarVariable {
    pub fn is_continuous_input(&self) -> bool {
        matches!(
            (&self.elem, &self.causality),
            (ScalarVariableElement::Real { .. }, Causality::Input)
        )
    }

    /// Whether a start value may be set before initialization.
    pub fn accepts_start_value(&self) -> bool {
        self.variability != Variability::Constant
            && !matches!(self.causality, Causality::CalculatedParameter | Causality::Independent)
            && self.initial != Some(Initial::Calculated)
    }
}
