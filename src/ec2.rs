mod clients;
mod error;
mod models;
mod wait;

pub use self::{clients::*, error::*, models::*, wait::*};

/// Gateway to the provider's API.
///
/// All calls are synchronous and return plain data records; `snapshots` is
/// guaranteed to return snapshots most-recent-first, which the commands rely
/// on for "latest snapshot" checks.
pub trait Ec2Client {
    fn instances(&mut self, project: Option<&ProjectName>) -> Ec2Result<Vec<Instance>>;

    fn volumes(&mut self, instance: &InstanceId) -> Ec2Result<Vec<Volume>>;

    fn snapshots(&mut self, volume: &VolumeId) -> Ec2Result<Vec<Snapshot>>;

    fn create_snapshot(&mut self, volume: &VolumeId, description: &str) -> Ec2Result<()>;

    fn start_instance(&mut self, instance: &InstanceId) -> Ec2Result<()>;

    fn stop_instance(&mut self, instance: &InstanceId) -> Ec2Result<()>;

    fn instance_state(&mut self, instance: &InstanceId) -> Ec2Result<InstanceState>;
}

pub fn has_pending_snapshot(snapshots: &[Snapshot]) -> bool {
    snapshots
        .first()
        .map_or(false, |snapshot| snapshot.state == SnapshotState::Pending)
}
