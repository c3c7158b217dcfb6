use crate::ec2::{Ec2Client, Ec2Error, Ec2Result, InstanceId, InstanceState};
use std::thread;
use std::time::Duration;

/// Polling knobs for [`wait_for_instance_state`]; the defaults match the
/// provider's own waiters (15s interval, 40 rounds).
#[derive(Copy, Clone, Debug)]
pub struct WaitOpts {
    pub interval: Duration,
    pub attempts: u32,
    pub sleep: fn(Duration),
}

impl WaitOpts {
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            sleep: |_| (),
            ..Self::default()
        }
    }
}

impl Default for WaitOpts {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
            attempts: 40,
            sleep: thread::sleep,
        }
    }
}

/// Polls until `instance` reaches `target`; a bounded replacement for the
/// wait-forever calls one would get from the provider's SDK.
pub fn wait_for_instance_state(
    ec2: &mut dyn Ec2Client,
    instance: &InstanceId,
    target: InstanceState,
    opts: &WaitOpts,
) -> Ec2Result<()> {
    for attempt in 0..opts.attempts {
        if attempt > 0 {
            (opts.sleep)(opts.interval);
        }

        if ec2.instance_state(instance)? == target {
            return Ok(());
        }
    }

    Err(Ec2Error::WaitTimedOut {
        instance: instance.to_owned(),
        target,
        waited: opts.interval * opts.attempts,
    })
}
