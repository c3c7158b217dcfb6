use crate::prelude::*;

pub struct ListInstances<'a, 'b> {
    env: &'a mut Environment<'b>,
    project: Option<ProjectName>,
}

impl<'a, 'b> ListInstances<'a, 'b> {
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
            writeln!(
                self.env.stdout,
                "{}",
                [
                    instance.id.as_str(),
                    instance.instance_type.as_str(),
                    instance.availability_zone.as_str(),
                    instance.state.as_str(),
                    instance.public_dns_name.as_str(),
                    instance.project().unwrap_or("<no project>"),
                ]
                .join(", ")
            )?;
        }

        Ok(())
    }
}
