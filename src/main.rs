use crate::prelude::*;
use clap::{Parser, Subcommand};
use std::io::stdout;
use std::ops::DerefMut;
use std::path::PathBuf;

mod commands;
mod ec2;
mod environment;
mod prelude;

#[cfg(test)]
mod testing;

/// Shotty manages EC2 snapshots
#[derive(Parser, Debug)]
struct Args {
    /// Runs application in a simulated safe-mode without applying any changes
    /// to the instances
    #[arg(short, long)]
    dry_run: bool,

    /// Name of the AWS profile to authenticate with; when omitted, the
    /// default credential resolution of the `aws` executable applies
    #[arg(short, long)]
    profile: Option<String>,

    /// By default, shotty tries to locate the `aws` executable inside your
    /// PATH variable - when this fails for you, using this parameter you can
    /// provide location of the `aws` executable by hand
    #[arg(long)]
    aws_path: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Commands for snapshots
    #[command(subcommand)]
    Snapshots(SnapshotsCommand),

    /// Commands for volumes
    #[command(subcommand)]
    Volumes(VolumesCommand),

    /// Commands for instances
    #[command(subcommand)]
    Instances(InstancesCommand),
}

#[derive(Subcommand, Debug)]
enum SnapshotsCommand {
    /// Lists snapshots associated with EC2 instances
    List {
        /// Only snapshots for project (tag Project:<name>)
        #[arg(long)]
        project: Option<String>,

        /// Lists all snapshots, not just the most recent snapshot for each
        /// volume
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
enum VolumesCommand {
    /// Lists volumes associated with EC2 instances
    List {
        /// Only volumes for project (tag Project:<name>)
        #[arg(long)]
        project: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum InstancesCommand {
    /// Lists EC2 instances
    List {
        /// Only instances for project (tag Project:<name>)
        #[arg(long)]
        project: Option<String>,
    },

    /// Creates a snapshot of all volumes of each instance, stopping and
    /// restarting the instances along the way
    Snapshot {
        /// Only instances for project (tag Project:<name>)
        #[arg(long)]
        project: Option<String>,
    },

    /// Starts EC2 instances
    Start {
        /// Only instances for project (tag Project:<name>)
        #[arg(long)]
        project: Option<String>,
    },

    /// Stops EC2 instances
    Stop {
        /// Only instances for project (tag Project:<name>)
        #[arg(long)]
        project: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let stdout = &mut stdout();
    let mut ec2 = init_ec2(&args)?;
    let mut env = Environment::new(stdout, ec2.deref_mut());

    match args.cmd {
        Command::Snapshots(SnapshotsCommand::List { project, all }) => {
            ListSnapshots::new(&mut env, project.map(ProjectName::new), all).run()
        }

        Command::Volumes(VolumesCommand::List { project }) => {
            ListVolumes::new(&mut env, project.map(ProjectName::new)).run()
        }

        Command::Instances(InstancesCommand::List { project }) => {
            ListInstances::new(&mut env, project.map(ProjectName::new)).run()
        }

        Command::Instances(InstancesCommand::Snapshot { project }) => {
            SnapshotInstances::new(&mut env, project.map(ProjectName::new)).run()
        }

        Command::Instances(InstancesCommand::Start { project }) => {
            StartInstances::new(&mut env, project.map(ProjectName::new)).run()
        }

        Command::Instances(InstancesCommand::Stop { project }) => {
            StopInstances::new(&mut env, project.map(ProjectName::new)).run()
        }
    }
}

fn init_ec2(args: &Args) -> Result<Box<dyn Ec2Client>> {
    let mut ec2 = if let Some(aws_path) = &args.aws_path {
        Ec2ProcessClient::new(aws_path, args.profile.clone())?
    } else {
        Ec2ProcessClient::find(args.profile.clone())
            .context("Couldn't initialize the EC2 client")?
    };

    if !args.dry_run {
        return Ok(Box::new(ec2));
    }

    println!(
        "{} --dry-run is active, no changes will be applied\n",
        "Note:".green(),
    );

    Ok(Box::new(Ec2FakeClient::clone_from(&mut ec2)?))
}
