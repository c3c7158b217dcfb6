use crate::ec2::{SnapshotId, SnapshotState};
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub state: SnapshotState,

    /// Percentage rendered by the provider, e.g. `100%`.
    pub progress: String,

    pub start_time: DateTime<Utc>,
    pub description: String,
}
