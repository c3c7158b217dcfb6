use crate::prelude::*;

pub struct StopInstances<'a, 'b> {
    env: &'a mut Environment<'b>,
    project: Option<ProjectName>,
}

impl<'a, 'b> StopInstances<'a, 'b> {
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
            writeln!(self.env.stdout, "Stopping {}...", instance.id)?;

            if let Err(err) = self.env.ec2.stop_instance(&instance.id) {
                writeln!(
                    self.env.stdout,
                    "{}",
                    format!("Could not stop instance {}. {}", instance.id, err).red()
                )?;
            }
        }

        Ok(())
    }
}
