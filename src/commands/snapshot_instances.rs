use crate::prelude::*;

pub const SNAPSHOT_DESCRIPTION: &str = "Created by Shotty";

pub struct SnapshotInstances<'a, 'b> {
    env: &'a mut Environment<'b>,
    project: Option<ProjectName>,
}

impl<'a, 'b> SnapshotInstances<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>, project: Option<ProjectName>) -> Self {
        Self { env, project }
    }

    pub fn run(mut self) -> Result<()> {
        let instances = self
            .env
            .ec2
            .instances(self.project.as_ref())
            .context("Couldn't list instances")?;

        for instance in instances {
            self.process_instance(&instance)
                .with_context(|| format!("Couldn't process instance: {}", instance.id))?;
        }

        writeln!(
            self.env.stdout,
            "{}",
            "Job complete. All specified instances have been snapshotted.".green()
        )?;

        Ok(())
    }

    fn process_instance(&mut self, instance: &Instance) -> Result<()> {
        let wait = self.env.wait;

        writeln!(self.env.stdout, "Stopping instance {}...", instance.id)?;

        self.env
            .ec2
            .stop_instance(&instance.id)
            .context("Couldn't stop instance")?;

        wait_for_instance_state(self.env.ec2, &instance.id, InstanceState::Stopped, &wait)?;

        let volumes = self
            .env
            .ec2
            .volumes(&instance.id)
            .context("Couldn't list volumes")?;

        for volume in volumes {
            // Stop-on-error is deliberate here; the context makes the
            // consequence visible instead of leaving the operator guessing
            // why the instance didn't come back up
            self.process_volume(&volume).with_context(|| {
                format!(
                    "Couldn't snapshot volume {} - note that instance {} has been left stopped",
                    volume.id, instance.id,
                )
            })?;
        }

        writeln!(self.env.stdout, "Restarting instance {}...", instance.id)?;

        self.env
            .ec2
            .start_instance(&instance.id)
            .context("Couldn't start instance")?;

        wait_for_instance_state(self.env.ec2, &instance.id, InstanceState::Running, &wait)?;

        Ok(())
    }

    fn process_volume(&mut self, volume: &Volume) -> Result<()> {
        let snapshots = self
            .env
            .ec2
            .snapshots(&volume.id)
            .context("Couldn't list snapshots")?;

        if has_pending_snapshot(&snapshots) {
            writeln!(
                self.env.stdout,
                "{}",
                format!(
                    "Skipping volume {}, snapshot already in progress",
                    volume.id
                )
                .yellow()
            )?;
        } else {
            writeln!(self.env.stdout, "Creating snapshot of volume {}...", volume.id)?;

            self.env
                .ec2
                .create_snapshot(&volume.id, SNAPSHOT_DESCRIPTION)
                .context("Couldn't create snapshot")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec2::utils::*;
    use crate::ec2::{Ec2FakeClient, Ec2FakeError, Ec2FakeInstance, Ec2FakeVolume};
    use crate::{assert_ec2, assert_result, assert_stdout};

    fn ec2() -> Ec2FakeClient {
        let mut ec2 = Ec2FakeClient::default();

        ec2.add(Ec2FakeInstance {
            id: "i-1",
            volumes: vec![
                Ec2FakeVolume {
                    id: "vol-1",
                    snapshots: vec![snapshot(
                        "snap-a",
                        SnapshotState::Pending,
                        "2000-01-01 12:00:00",
                    )],
                    ..Default::default()
                },
                Ec2FakeVolume {
                    id: "vol-2",
                    ..Default::default()
                },
            ],
            ..Default::default()
        });

        ec2.add(Ec2FakeInstance {
            id: "i-2",
            volumes: vec![Ec2FakeVolume {
                id: "vol-3",
                ..Default::default()
            }],
            ..Default::default()
        });

        ec2
    }

    #[test]
    fn smoke() {
        colored::control::set_override(true);

        let mut stdout = Vec::new();
        let mut ec2 = ec2();

        SnapshotInstances::new(&mut Environment::test(&mut stdout, &mut ec2), None)
            .run()
            .unwrap();

        assert_stdout!(
            r#"
            Stopping instance i-1...
            <fg=33>Skipping volume vol-1, snapshot already in progress</fg>
            Creating snapshot of volume vol-2...
            Restarting instance i-1...
            Stopping instance i-2...
            Creating snapshot of volume vol-3...
            Restarting instance i-2...
            <fg=32>Job complete. All specified instances have been snapshotted.</fg>
            "#,
            stdout
        );

        assert_ec2!(
            r#"
            i-1 (running)
            -> vol-1
               -> snap-a (pending)
            -> vol-2
               -> snap-0001 (pending) "Created by Shotty"

            i-2 (running)
            -> vol-3
               -> snap-0002 (pending) "Created by Shotty"
            "#,
            ec2
        );
    }

    #[test]
    fn smoke_with_project() {
        colored::control::set_override(true);

        let mut stdout = Vec::new();
        let mut ec2 = Ec2FakeClient::default();

        ec2.add(Ec2FakeInstance {
            id: "i-1",
            project: Some("web"),
            volumes: vec![Ec2FakeVolume {
                id: "vol-1",
                ..Default::default()
            }],
            ..Default::default()
        });

        ec2.add(Ec2FakeInstance {
            id: "i-2",
            project: Some("db"),
            volumes: vec![Ec2FakeVolume {
                id: "vol-2",
                ..Default::default()
            }],
            ..Default::default()
        });

        SnapshotInstances::new(
            &mut Environment::test(&mut stdout, &mut ec2),
            Some(ProjectName::new("web")),
        )
        .run()
        .unwrap();

        assert_stdout!(
            r#"
            Stopping instance i-1...
            Creating snapshot of volume vol-1...
            Restarting instance i-1...
            <fg=32>Job complete. All specified instances have been snapshotted.</fg>
            "#,
            stdout
        );

        assert_ec2!(
            r#"
            i-1 (running) [Project=web]
            -> vol-1
               -> snap-0001 (pending) "Created by Shotty"

            i-2 (running) [Project=db]
            -> vol-2
            "#,
            ec2
        );
    }

    #[test]
    fn failed_snapshot_leaves_instance_stopped() {
        colored::control::set_override(true);

        let mut stdout = Vec::new();
        let mut ec2 = Ec2FakeClient::default();

        ec2.add(Ec2FakeInstance {
            id: "i-1",
            volumes: vec![
                Ec2FakeVolume {
                    id: "vol-1",
                    ..Default::default()
                },
                Ec2FakeVolume {
                    id: "vol-2",
                    ..Default::default()
                },
            ],
            ..Default::default()
        });

        ec2.add(Ec2FakeInstance {
            id: "i-2",
            volumes: vec![Ec2FakeVolume {
                id: "vol-3",
                ..Default::default()
            }],
            ..Default::default()
        });

        ec2.inject_error(Ec2FakeError::OnCreateSnapshot { volume: "vol-2" });

        let result =
            SnapshotInstances::new(&mut Environment::test(&mut stdout, &mut ec2), None).run();

        assert_stdout!(
            r#"
            Stopping instance i-1...
            Creating snapshot of volume vol-1...
            Creating snapshot of volume vol-2...
            "#,
            stdout
        );

        assert_result!(
            r#"
            Couldn't process instance: i-1

            Caused by:
                0: Couldn't snapshot volume vol-2 - note that instance i-1 has been left stopped
                1: Couldn't create snapshot
                2: InjectedError
            "#,
            result
        );

        assert_ec2!(
            r#"
            i-1 (stopped)
            -> vol-1
               -> snap-0001 (pending) "Created by Shotty"
            -> vol-2

            i-2 (running)
            -> vol-3
            "#,
            ec2
        );
    }

    #[test]
    fn instance_that_never_stops() {
        colored::control::set_override(true);

        let mut stdout = Vec::new();
        let mut ec2 = ec2();

        ec2.hold_state("i-1");

        let result =
            SnapshotInstances::new(&mut Environment::test(&mut stdout, &mut ec2), None).run();

        assert_stdout!(
            r#"
            Stopping instance i-1...
            "#,
            stdout
        );

        assert_result!(
            r#"
            Couldn't process instance: i-1

            Caused by:
                Instance i-1 didn't reach the `stopped` state within 10m
            "#,
            result
        );
    }
}
