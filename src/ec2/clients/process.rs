use crate::ec2::*;
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use pathsearch::find_executable_in_path;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Talks to EC2 by launching the `aws` CLI and parsing its JSON output;
/// credential and region resolution stay entirely on the CLI's side.
pub struct Ec2ProcessClient {
    aws: PathBuf,
    profile: Option<String>,
}

impl Ec2ProcessClient {
    pub fn new(aws: impl AsRef<Path>, profile: Option<String>) -> Ec2Result<Self> {
        let aws = aws.as_ref();

        if !aws.exists() {
            return Err(Ec2Error::Other(anyhow!(
                "Couldn't find the `aws` executable: {}",
                aws.display()
            )));
        }

        Ok(Self {
            aws: aws.into(),
            profile,
        })
    }

    pub fn find(profile: Option<String>) -> Ec2Result<Self> {
        let aws = find_executable_in_path("aws")
            .ok_or_else(|| anyhow!("Couldn't find the `aws` executable in your `PATH` - please try specifying exact location with `--aws-path`"))?;

        Self::new(aws, profile)
    }

    fn execute(&mut self, callback: impl FnOnce(&mut Command)) -> Ec2Result<String> {
        let mut command = Command::new(&self.aws);

        command.arg("ec2");

        callback(&mut command);

        command.arg("--output").arg("json");

        if let Some(profile) = &self.profile {
            command.arg("--profile").arg(profile);
        }

        let output = command
            .output()
            .context("Couldn't launch the `aws` executable")?;

        if output.status.success() {
            let stdout = String::from_utf8(output.stdout).context("Couldn't read aws's stdout")?;

            Ok(stdout)
        } else {
            let stderr = String::from_utf8(output.stderr)
                .context("Couldn't read aws's stderr")?
                .trim()
                .to_string();

            Err(Ec2Error::Other(anyhow!(
                "aws returned a non-zero status code and said: {}",
                stderr,
            )))
        }
    }

    fn parse<T>(out: String) -> Ec2Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&out)
            .context("Couldn't parse aws's stdout")
            .map_err(Ec2Error::Other)
    }

    fn describe_instances(
        &mut self,
        callback: impl FnOnce(&mut Command),
    ) -> Ec2Result<Vec<Instance>> {
        let out = self.execute(|command| {
            command.arg("describe-instances");

            callback(command);
        })?;

        let wire: WireDescribeInstances = Self::parse(out)?;

        let instances = wire
            .reservations
            .into_iter()
            .flat_map(|reservation| reservation.instances)
            .map(WireInstance::into_model)
            .collect();

        Ok(instances)
    }
}

impl Ec2Client for Ec2ProcessClient {
    fn instances(&mut self, project: Option<&ProjectName>) -> Ec2Result<Vec<Instance>> {
        self.describe_instances(|command| {
            if let Some(project) = project {
                command
                    .arg("--filters")
                    .arg(format!("Name=tag:{},Values={}", PROJECT_TAG, project));
            }
        })
    }

    fn volumes(&mut self, instance: &InstanceId) -> Ec2Result<Vec<Volume>> {
        let out = self.execute(|command| {
            command
                .arg("describe-volumes")
                .arg("--filters")
                .arg(format!("Name=attachment.instance-id,Values={}", instance));
        })?;

        let wire: WireDescribeVolumes = Self::parse(out)?;

        Ok(wire.volumes.into_iter().map(WireVolume::into_model).collect())
    }

    fn snapshots(&mut self, volume: &VolumeId) -> Ec2Result<Vec<Snapshot>> {
        let out = self.execute(|command| {
            command
                .arg("describe-snapshots")
                .arg("--filters")
                .arg(format!("Name=volume-id,Values={}", volume));
        })?;

        let wire: WireDescribeSnapshots = Self::parse(out)?;

        // The CLI doesn't promise any particular ordering, while the trait
        // does promise most-recent-first
        let snapshots = wire
            .snapshots
            .into_iter()
            .map(WireSnapshot::into_model)
            .sorted_by(|a, b| b.start_time.cmp(&a.start_time))
            .collect();

        Ok(snapshots)
    }

    fn create_snapshot(&mut self, volume: &VolumeId, description: &str) -> Ec2Result<()> {
        self.execute(|command| {
            command
                .arg("create-snapshot")
                .arg("--volume-id")
                .arg(volume.as_str())
                .arg("--description")
                .arg(description);
        })?;

        Ok(())
    }

    fn start_instance(&mut self, instance: &InstanceId) -> Ec2Result<()> {
        self.execute(|command| {
            command
                .arg("start-instances")
                .arg("--instance-ids")
                .arg(instance.as_str());
        })?;

        Ok(())
    }

    fn stop_instance(&mut self, instance: &InstanceId) -> Ec2Result<()> {
        self.execute(|command| {
            command
                .arg("stop-instances")
                .arg("--instance-ids")
                .arg(instance.as_str());
        })?;

        Ok(())
    }

    fn instance_state(&mut self, instance: &InstanceId) -> Ec2Result<InstanceState> {
        let instances = self.describe_instances(|command| {
            command.arg("--instance-ids").arg(instance.as_str());
        })?;

        instances
            .into_iter()
            .next()
            .map(|instance| instance.state)
            .ok_or_else(|| Ec2Error::NoSuchInstance {
                instance: instance.to_owned(),
            })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireDescribeInstances {
    #[serde(default)]
    reservations: Vec<WireReservation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireReservation {
    #[serde(default)]
    instances: Vec<WireInstance>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireInstance {
    instance_id: String,
    instance_type: String,
    placement: WirePlacement,
    state: WireInstanceState,

    #[serde(default)]
    public_dns_name: String,

    #[serde(default)]
    tags: Vec<WireTag>,
}

impl WireInstance {
    fn into_model(self) -> Instance {
        Instance {
            id: InstanceId::new(self.instance_id),
            instance_type: self.instance_type,
            availability_zone: self.placement.availability_zone,
            state: self.state.name,
            public_dns_name: self.public_dns_name,
            tags: self
                .tags
                .into_iter()
                .map(|tag| (tag.key, tag.value))
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WirePlacement {
    availability_zone: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireInstanceState {
    name: InstanceState,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireTag {
    key: String,
    value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireDescribeVolumes {
    #[serde(default)]
    volumes: Vec<WireVolume>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireVolume {
    volume_id: String,
    volume_type: String,
    state: VolumeState,
    size: u32,
    encrypted: bool,
}

impl WireVolume {
    fn into_model(self) -> Volume {
        Volume {
            id: VolumeId::new(self.volume_id),
            volume_type: self.volume_type,
            state: self.state,
            size_gib: self.size,
            encrypted: self.encrypted,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireDescribeSnapshots {
    #[serde(default)]
    snapshots: Vec<WireSnapshot>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireSnapshot {
    snapshot_id: String,
    state: SnapshotState,

    #[serde(default)]
    progress: String,

    start_time: DateTime<Utc>,

    #[serde(default)]
    description: String,
}

impl WireSnapshot {
    fn into_model(self) -> Snapshot {
        Snapshot {
            id: SnapshotId::new(self.snapshot_id),
            state: self.state,
            progress: self.progress,
            start_time: self.start_time,
            description: self.description,
        }
    }
}
