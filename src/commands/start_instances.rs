use crate::prelude::*;

pub struct StartInstances<'a, 'b> {
    env: &'a mut Environment<'b>,
    project: Option<ProjectName>,
}

impl<'a, 'b> StartInstances<'a, 'b> {
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
            writeln!(self.env.stdout, "Starting {}...", instance.id)?;

            // A failure here concerns this instance only, the rest of the
            // fleet still gets its chance
            if let Err(err) = self.env.ec2.start_instance(&instance.id) {
                writeln!(
                    self.env.stdout,
                    "{}",
                    format!("Could not start instance {}. {}", instance.id, err).red()
                )?;
            }
        }

        Ok(())
    }
}
