use hard_xml::XmlRead;

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "ModelExchange")]
pub struct ModelExchange {
    /// Short class name according to C-syntax
    #[xml(attr = "modelIdentifier")]
    pub model_identifier: String,

    /// If true, a tool is needed to execute the model and the FMU just contains the communication
    /// to this tool.
    #[xml(default, attr = "needsExecutionTool")]
    pub needs_execution_tool: bool,

    #[xml(default, attr = "completedIntegratorStepNotNeeded")]
    pub completed_integrator_step_not_needed: bool,

    #[xml(default, attr = "canBeInstantiatedOnlyOncePerProcess")]
    pub can_be_instantiated_only_once_per_process: bool,

    #[xml(default, attr = "canNotUseMemoryManagementFunctions")]
    pub can_not_use_memory_management_functions: bool,

    #[xml(default, attr = "canGetAndSetFMUstate")]
    pub can_get_and_set_fmu_state: bool,

    #[xml(default, attr = "canSerializeFMUstate")]
    pub can_serialize_fmu_state: bool,

    /// If true, the directional derivative of the equations can be computed with
    /// fmi2GetDirectionalDerivative
    #[xml(default, attr = "providesDirectionalDerivative")]
    pub provides_directional_derivative: bool,
}

#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "CoSimulation")]
pub struct CoSimulation {
    /// Short class name according to C-syntax
    #[xml(attr = "modelIdentifier")]
    pub model_identifier: String,

    #[xml(default, attr = "needsExecutionTool")]
    pub needs_execution_tool: bool,

    /// If true, the slave can handle variable communication step size. The communication step
    /// size (parameter communicationStepSize of fmi2DoStep) has not to be constant for each call.
    #[xml(default, attr = "canHandleVariableCommunicationStepSize")]
    pub can_handle_variable_communication_step_size: bool,

    /// If true, the slave is able to interpolate continuous inputs.
    #[xml(default, attr = "canInterpolateInputs")]
    pub can_interpolate_inputs: bool,

    /// The slave is able to provide derivatives of outputs with maximum order.
    #[xml(default, attr = "maxOutputDerivativeOrder")]
    pub max_output_derivative_order: u32,

    #[xml(default, attr = "canRunAsynchronuously")]
    pub can_run_asynchronuously: bool,

    #[xml(default, attr = "canBeInstantiatedOnlyOncePerProcess")]
    pub can_be_instantiated_only_once_per_process: bool,

    #[xml(default, attr = "canNotUseMemoryManagementFunctions")]
    pub can_not_use_memory_management_functions: bool,

    #[xml(default, attr = "canGetAndSetFMUstate")]
    pub can_get_and_set_fmu_state: bool,

    #[xml(default, attr = "canSerializeFMUstate")]
    pub can_serialize_fmu_state: bool,
}

/// The FMI 2.0 interface kinds an FMU can offer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InterfaceType {
    ModelExchange,
    CoSimulation,
}

impl std::fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterfaceType::ModelExchange => write!(f, "ModelExchange"),
            InterfaceType::CoSimulation => write!(f, "CoSimulation"),
        }
    }
}
