//! This module implements the FMI 2.0 ModelDescription datamodel and provides attributes to
//! `hard_xml` to generate an XML deserializer.

mod interface_type;
mod model_description;
mod scalar_variable;
mod variable_dependency;

pub use interface_type::*;
pub use model_description::*;
pub use scalar_variable::*;
pub use variable_dependency::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_exchange() {
        let s = r##"<ModelExchange modelIdentifier="MyLibrary_SpringMassDamper"/>"##;
        let x: ModelExchange = crate::deserialize(s).unwrap();
        assert!(x.model_identifier == "MyLibrary_SpringMassDamper");
        assert!(!x.completed_integrator_step_not_needed);
    }

    #[test]
    fn test_default_experiment() {
        use crate::traits::DefaultExperiment as _;

        let s = r##"<DefaultExperiment stopTime="3.0" tolerance="0.0001"/>"##;
        let x: DefaultExperiment = crate::deserialize(s).unwrap();
        assert_eq!(x.start_time(), None);
        assert_eq!(x.stop_time(), Some(3.0));
        assert_eq!(x.tolerance(), Some(0.0001));

        let s = r#"<DefaultExperiment startTime = "0.20000000000000000e+00" stopTime = "1.50000000000000000e+00" stepSize="1e-3"/>"#;
        let x: DefaultExperiment = crate::deserialize(s).unwrap();
        assert_eq!(x.start_time(), Some(0.2));
        assert_eq!(x.stop_time(), Some(1.5));
        assert_eq!(x.step_size(), Some(1e-3));
    }

    #[test]
    fn test_model_variables() {
        let s = r##"
            <ModelVariables>
                <ScalarVariable name="x[1]" valueReference="0" initial="exact"> <Real/> </ScalarVariable>
                <ScalarVariable name="x[2]" valueReference="1" initial="exact"> <Real/> </ScalarVariable>
                <ScalarVariable name="der(x[1])" valueReference="2"> <Real derivative="1"/> </ScalarVariable>
                <ScalarVariable name="der(x[2])" valueReference="3"> <Real derivative="2"/> </ScalarVariable>
            </ModelVariables>
        "##;
        let x: ModelVariables = crate::deserialize(s).unwrap();
        assert_eq!(x.variables.len(), 4);
        assert!(x
            .variables
            .iter()
            .map(|v| &v.name)
            .zip(["x[1]", "x[2]", "der(x[1])", "der(x[2])"].iter())
            .all(|(a, b)| a == b));
    }

    #[test]
    fn test_model_structure() {
        let s = r##"
            <ModelStructure>
                <Outputs> <Unknown index="3" /> <Unknown index="4" /> </Outputs>
                <Derivatives> <Unknown index="7" /> <Unknown index="8" /> </Derivatives>
                <InitialUnknowns> <Unknown index="3" /> <Unknown index="4" /> <Unknown index="7" dependencies="5 2" /> <Unknown index="8" dependencies="5 6" /> </InitialUnknowns>
            </ModelStructure>
        "##;
        let x: ModelStructure = crate::deserialize(s).unwrap();
        assert_eq!(x.outputs.unknowns[0].index, 3);
        assert_eq!(x.outputs.unknowns[1].index, 4);
        assert_eq!(x.derivatives.unknowns[0].index, 7);
        assert_eq!(x.derivatives.unknowns[1].index, 8);
        assert_eq!(x.initial_unknowns.unknowns[2].index, 7);
        assert_eq!(x.initial_unknowns.unknowns[2].dependencies(), &[5, 2]);
        assert_eq!(x.initial_unknowns.unknowns[3].dependencies(), &[5, 6]);
    }
}
