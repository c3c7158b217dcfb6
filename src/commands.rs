mod list_instances;
mod list_snapshots;
mod list_volumes;
mod snapshot_instances;
mod start_instances;
mod stop_instances;

pub use self::{
    list_instances::*, list_snapshots::*, list_volumes::*, snapshot_instances::*,
    start_instances::*, stop_instances::*,
};
