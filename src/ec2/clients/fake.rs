use crate::ec2::*;
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

#[cfg(test)]
use indexmap::IndexMap;

#[cfg(test)]
use std::collections::HashSet;

#[cfg(test)]
use std::fmt;

/// In-memory stand-in for the real EC2 API; backs `--dry-run` and the test
/// suite.
#[derive(Debug, Default)]
pub struct Ec2FakeClient {
    instances: BTreeMap<InstanceId, FakeInstance>,
    snapshot_seq: usize,

    #[cfg(test)]
    errors: HashSet<Ec2FakeError<'static>>,

    #[cfg(test)]
    held: HashSet<InstanceId>,
}

#[derive(Debug)]
struct FakeInstance {
    instance: Instance,
    volumes: Vec<FakeVolume>,
}

#[derive(Debug)]
struct FakeVolume {
    volume: Volume,
    snapshots: Vec<Snapshot>,
}

impl Ec2FakeClient {
    /// Seeds the fake with the fleet visible through `other`, so that a dry
    /// run sees the real instances without being able to touch them.
    pub fn clone_from(other: &mut dyn Ec2Client) -> Ec2Result<Self> {
        let mut this = Self::default();

        for instance in other.instances(None)? {
            let mut volumes = Vec::new();

            for volume in other.volumes(&instance.id)? {
                let snapshots = other.snapshots(&volume.id)?;

                volumes.push(FakeVolume { volume, snapshots });
            }

            this.instances
                .insert(instance.id.clone(), FakeInstance { instance, volumes });
        }

        Ok(this)
    }

    #[cfg(test)]
    pub fn add(&mut self, instance: Ec2FakeInstance<'_>) {
        let mut tags = IndexMap::new();

        if let Some(project) = instance.project {
            tags.insert(PROJECT_TAG.to_string(), project.to_string());
        }

        let volumes = instance
            .volumes
            .into_iter()
            .map(|volume| FakeVolume {
                volume: Volume {
                    id: VolumeId::new(volume.id),
                    volume_type: volume.volume_type.into(),
                    state: volume.state,
                    size_gib: volume.size_gib,
                    encrypted: volume.encrypted,
                },
                snapshots: volume.snapshots,
            })
            .collect();

        self.instances.insert(
            InstanceId::new(instance.id),
            FakeInstance {
                instance: Instance {
                    id: InstanceId::new(instance.id),
                    instance_type: instance.instance_type.into(),
                    availability_zone: instance.availability_zone.into(),
                    state: instance.state,
                    public_dns_name: instance.public_dns_name.into(),
                    tags,
                },
                volumes,
            },
        );
    }

    #[cfg(test)]
    pub fn inject_error(&mut self, error: Ec2FakeError<'static>) {
        self.errors.insert(error);
    }

    /// Marks an instance as never settling after a start/stop call, so that
    /// the wait-for-state timeout path can be exercised.
    #[cfg(test)]
    pub fn hold_state(&mut self, instance: impl AsRef<str>) {
        self.held.insert(InstanceId::new(instance));
    }

    fn get_mut(&mut self, instance: &InstanceId) -> Ec2Result<&mut FakeInstance> {
        self.instances
            .get_mut(instance)
            .ok_or_else(|| Ec2Error::NoSuchInstance {
                instance: instance.to_owned(),
            })
    }

    fn get_volume_mut(&mut self, volume: &VolumeId) -> Ec2Result<&mut FakeVolume> {
        self.instances
            .values_mut()
            .flat_map(|entry| entry.volumes.iter_mut())
            .find(|entry| &entry.volume.id == volume)
            .ok_or_else(|| Ec2Error::NoSuchVolume {
                volume: volume.to_owned(),
            })
    }
}

impl Ec2Client for Ec2FakeClient {
    fn instances(&mut self, project: Option<&ProjectName>) -> Ec2Result<Vec<Instance>> {
        let instances = self
            .instances
            .values()
            .map(|entry| &entry.instance)
            .filter(|instance| match project {
                Some(project) => instance.project() == Some(project.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        Ok(instances)
    }

    fn volumes(&mut self, instance: &InstanceId) -> Ec2Result<Vec<Volume>> {
        let volumes = self
            .get_mut(instance)?
            .volumes
            .iter()
            .map(|entry| entry.volume.clone())
            .collect();

        Ok(volumes)
    }

    fn snapshots(&mut self, volume: &VolumeId) -> Ec2Result<Vec<Snapshot>> {
        Ok(self.get_volume_mut(volume)?.snapshots.clone())
    }

    fn create_snapshot(&mut self, volume: &VolumeId, description: &str) -> Ec2Result<()> {
        #[cfg(test)]
        if self.errors.contains(&Ec2FakeError::OnCreateSnapshot {
            volume: volume.as_str(),
        }) {
            return Err(Ec2Error::InjectedError);
        }

        self.snapshot_seq += 1;

        let snapshot = Snapshot {
            id: SnapshotId::new(format!("snap-{:04}", self.snapshot_seq)),
            state: SnapshotState::Pending,
            progress: "0%".into(),
            start_time: Utc.timestamp_opt(self.snapshot_seq as i64, 0).unwrap(),
            description: description.into(),
        };

        // Most-recent-first, same as the trait's contract
        self.get_volume_mut(volume)?.snapshots.insert(0, snapshot);

        Ok(())
    }

    fn start_instance(&mut self, instance: &InstanceId) -> Ec2Result<()> {
        #[cfg(test)]
        if self.errors.contains(&Ec2FakeError::OnStartInstance {
            instance: instance.as_str(),
        }) {
            return Err(Ec2Error::InjectedError);
        }

        let state = InstanceState::Running;

        #[cfg(test)]
        let state = if self.held.contains(instance) {
            InstanceState::Pending
        } else {
            state
        };

        self.get_mut(instance)?.instance.state = state;

        Ok(())
    }

    fn stop_instance(&mut self, instance: &InstanceId) -> Ec2Result<()> {
        #[cfg(test)]
        if self.errors.contains(&Ec2FakeError::OnStopInstance {
            instance: instance.as_str(),
        }) {
            return Err(Ec2Error::InjectedError);
        }

        let state = InstanceState::Stopped;

        #[cfg(test)]
        let state = if self.held.contains(instance) {
            InstanceState::Stopping
        } else {
            state
        };

        self.get_mut(instance)?.instance.state = state;

        Ok(())
    }

    fn instance_state(&mut self, instance: &InstanceId) -> Ec2Result<InstanceState> {
        Ok(self.get_mut(instance)?.instance.state)
    }
}

#[cfg(test)]
impl fmt::Display for Ec2FakeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, entry) in self.instances.values().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }

            write!(f, "{} ({})", entry.instance.id, entry.instance.state)?;

            if let Some(project) = entry.instance.project() {
                write!(f, " [Project={}]", project)?;
            }

            writeln!(f)?;

            for volume in &entry.volumes {
                writeln!(f, "-> {}", volume.volume.id)?;

                for snapshot in &volume.snapshots {
                    write!(f, "   -> {} ({})", snapshot.id, snapshot.state)?;

                    if snapshot.description.is_empty() {
                        writeln!(f)?;
                    } else {
                        writeln!(f, " {:?}", snapshot.description)?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[derive(Clone, Debug)]
pub struct Ec2FakeInstance<'a> {
    pub id: &'a str,
    pub instance_type: &'a str,
    pub availability_zone: &'a str,
    pub state: InstanceState,
    pub public_dns_name: &'a str,
    pub project: Option<&'a str>,
    pub volumes: Vec<Ec2FakeVolume<'a>>,
}

#[cfg(test)]
impl Default for Ec2FakeInstance<'static> {
    fn default() -> Self {
        Self {
            id: "",
            instance_type: "t2.micro",
            availability_zone: "us-east-1a",
            state: InstanceState::Running,
            public_dns_name: "",
            project: None,
            volumes: Default::default(),
        }
    }
}

#[cfg(test)]
#[derive(Clone, Debug)]
pub struct Ec2FakeVolume<'a> {
    pub id: &'a str,
    pub volume_type: &'a str,
    pub state: VolumeState,
    pub size_gib: u32,
    pub encrypted: bool,
    pub snapshots: Vec<Snapshot>,
}

#[cfg(test)]
impl Default for Ec2FakeVolume<'static> {
    fn default() -> Self {
        Self {
            id: "",
            volume_type: "gp2",
            state: VolumeState::InUse,
            size_gib: 8,
            encrypted: false,
            snapshots: Default::default(),
        }
    }
}

#[cfg(test)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ec2FakeError<'a> {
    OnCreateSnapshot { volume: &'a str },
    OnStartInstance { instance: &'a str },
    OnStopInstance { instance: &'a str },
}
