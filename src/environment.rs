use crate::ec2::{Ec2Client, WaitOpts};
use std::io::Write;

/// Everything a command needs to run; constructed once in `main()` and
/// swapped for a fake-backed one in tests.
pub struct Environment<'a> {
    pub stdout: &'a mut dyn Write,
    pub ec2: &'a mut dyn Ec2Client,
    pub wait: WaitOpts,
}

impl<'a> Environment<'a> {
    pub fn new(stdout: &'a mut dyn Write, ec2: &'a mut dyn Ec2Client) -> Self {
        Self {
            stdout,
            ec2,
            wait: WaitOpts::default(),
        }
    }

    #[cfg(test)]
    pub fn test(stdout: &'a mut dyn Write, ec2: &'a mut dyn Ec2Client) -> Self {
        Self {
            stdout,
            ec2,
            wait: WaitOpts::instant(),
        }
    }
}
