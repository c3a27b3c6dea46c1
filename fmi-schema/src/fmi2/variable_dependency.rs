use hard_xml::XmlRead;

use crate::utils::AttrList;

/// Dependency of scalar Unknown from Knowns in Continuous-Time and Event Mode (ModelExchange),
/// and at Communication Points (CoSimulation): Unknown=f(Known_1, Known_2, ...).
/// The Knowns are "inputs", "continuous states" and "independent variable" (usually time)".
#[derive(Clone, Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "Unknown")]
pub struct Unknown {
    /// ScalarVariable index of Unknown, starting at 1.
    #[xml(attr = "index")]
    pub index: u32,

    /// If not present, it must be assumed that the Unknown depends on all Knowns.
    #[xml(attr = "dependencies")]
    pub dependencies: Option<AttrList<u32>>,
}

impl Unknown {
    pub fn dependencies(&self) -> &[u32] {
        self.dependencies
            .as_ref()
            .map(|deps| deps.0.as_slice())
            .unwrap_or_default()
    }
}
