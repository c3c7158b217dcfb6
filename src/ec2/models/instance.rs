use crate::ec2::{InstanceId, InstanceState};
use indexmap::IndexMap;

/// Tag used to group instances into fleets; the only filtering criterion
/// shotty understands.
pub const PROJECT_TAG: &str = "Project";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    pub id: InstanceId,
    pub instance_type: String,
    pub availability_zone: String,
    pub state: InstanceState,

    /// Empty for instances that don't have a public address (e.g. stopped
    /// ones).
    pub public_dns_name: String,

    pub tags: IndexMap<String, String>,
}

impl Instance {
    pub fn project(&self) -> Option<&str> {
        self.tags.get(PROJECT_TAG).map(String::as_str)
    }
}
