use crate::prelude::*;

pub struct ListSnapshots<'a, 'b> {
    env: &'a mut Environment<'b>,
    project: Option<ProjectName>,
    all: bool,
}

impl<'a, 'b> ListSnapshots<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>, project: Option<ProjectName>, all: bool) -> Self {
        Self { env, project, all }
    }

    pub fn run(self) -> Result<()> {
        let instances = self
            .env
            .ec2
            .instances(self.project.as_ref())
            .context("Couldn't list instances")?;

        for instance in instances {
            let volumes = self
                .env
                .ec2
                .volumes(&instance.id)
                .with_context(|| format!("Couldn't list volumes of instance: {}", instance.id))?;

            for volume in volumes {
                let snapshots = self
                    .env
                    .ec2
                    .snapshots(&volume.id)
                    .with_context(|| format!("Couldn't list snapshots of volume: {}", volume.id))?;

                for snapshot in snapshots {
                    let start_time = snapshot.start_time.format("%c").to_string();

                    writeln!(
                        self.env.stdout,
                        "{}",
                        [
                            snapshot.id.as_str(),
                            volume.id.as_str(),
                            instance.id.as_str(),
                            snapshot.state.as_str(),
                            snapshot.progress.as_str(),
                            start_time.as_str(),
                        ]
                        .join(", ")
                    )?;

                    // Snapshots arrive most-recent-first, so stopping at the
                    // first completed one prints the latest completed snapshot
                    // plus whatever is still in flight before it
                    if !self.all && snapshot.state == SnapshotState::Completed {
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}
