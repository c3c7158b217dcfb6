mod instance;
mod instance_id;
mod instance_state;
mod project_name;
mod snapshot;
mod snapshot_id;
mod snapshot_state;
mod volume;
mod volume_id;
mod volume_state;

pub use self::{
    instance::*, instance_id::*, instance_state::*, project_name::*, snapshot::*, snapshot_id::*,
    snapshot_state::*, volume::*, volume_id::*, volume_state::*,
};
