use crate::prelude::*;

pub struct ListVolumes<'a, 'b> {
    env: &'a mut Environment<'b>,
    project: Option<ProjectName>,
}

impl<'a, 'b> ListVolumes<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>, project: Option<ProjectName>) -> Self {
        Self { env, project }
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
                let size = format!("{}GiB", volume.size_gib);

                let encrypted = if volume.encrypted {
                    "Encrypted"
                } else {
                    "Not Encrypted"
                };

                writeln!(
                    self.env.stdout,
                    "{}",
                    [
                        volume.id.as_str(),
                        instance.id.as_str(),
                        volume.volume_type.as_str(),
                        volume.state.as_str(),
                        size.as_str(),
                        encrypted,
                    ]
                    .join(", ")
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_stdout;
    use crate::ec2::{Ec2FakeClient, Ec2FakeInstance, Ec2FakeVolume};

    fn ec2() -> Ec2FakeClient {
        let mut ec2 = Ec2FakeClient::default();

        ec2.add(Ec2FakeInstance {
            id: "i-1",
            project: Some("web"),
            volumes: vec![
                Ec2FakeVolume {
                    id: "vol-1",
                    size_gib: 16,
                    encrypted: true,
                    ..Default::default()
                },
                Ec2FakeVolume {
                    id: "vol-2",
                    volume_type: "io1",
                    ..Default::default()
                },
            ],
            ..Default::default()
        });

        ec2.add(Ec2FakeInstance {
            id: "i-2",
            volumes: vec![Ec2FakeVolume {
                id: "vol-3",
                size_gib: 100,
                ..Default::default()
            }],
            ..Default::default()
        });

        ec2
    }

    #[test]
    fn all_volumes() {
        let mut stdout = Vec::new();
        let mut ec2 = ec2();

        ListVolumes::new(&mut Environment::test(&mut stdout, &mut ec2), None)
            .run()
            .unwrap();

        assert_stdout!(
            r#"
            vol-1, i-1, gp2, in-use, 16GiB, Encrypted
            vol-2, i-1, io1, in-use, 8GiB, Not Encrypted
            vol-3, i-2, gp2, in-use, 100GiB, Not Encrypted
            "#,
            stdout
        );
    }

    #[test]
    fn volumes_of_project() {
        let mut stdout = Vec::new();
        let mut ec2 = ec2();

        ListVolumes::new(
            &mut Environment::test(&mut stdout, &mut ec2),
            Some(ProjectName::new("web")),
        )
        .run()
        .unwrap();

        assert_stdout!(
            r#"
            vol-1, i-1, gp2, in-use, 16GiB, Encrypted
            vol-2, i-1, io1, in-use, 8GiB, Not Encrypted
            "#,
            stdout
        );
    }
}
