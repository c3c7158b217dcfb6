use crate::ec2::{VolumeId, VolumeState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Volume {
    pub id: VolumeId,
    pub volume_type: String,
    pub state: VolumeState,
    pub size_gib: u32,
    pub encrypted: bool,
}
