use crate::ec2::{InstanceId, InstanceState, VolumeId};
use std::result;
use std::time::Duration;
use thiserror::Error;

pub type Ec2Result<T> = result::Result<T, Ec2Error>;

#[derive(Debug, Error)]
pub enum Ec2Error {
    #[error("No such instance: {instance}")]
    NoSuchInstance { instance: InstanceId },

    #[error("No such volume: {volume}")]
    NoSuchVolume { volume: VolumeId },

    #[error(
        "Instance {instance} didn't reach the `{target}` state within {}",
        humantime::format_duration(*.waited)
    )]
    WaitTimedOut {
        instance: InstanceId,
        target: InstanceState,
        waited: Duration,
    },

    #[cfg(test)]
    #[error("InjectedError")]
    InjectedError,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
impl PartialEq<Ec2Error> for Ec2Error {
    fn eq(&self, other: &Ec2Error) -> bool {
        self.to_string() == other.to_string()
    }
}
