//! Waiting for the game process.

use std::time::Duration;

use anyhow::Result;
use d2reader_core::{Error, ProcessHandle};
use tracing::{debug, info};

use crate::shutdown::ShutdownSignal;

/// Open the process by PID or by one of `names`
pub fn open_process(pid: Option<u32>, names: &[&str]) -> d2reader_core::Result<ProcessHandle> {
    match pid {
        Some(pid) => ProcessHandle::open(pid),
        None => ProcessHandle::find_and_open(names),
    }
}

/// Keep trying to attach every `interval` until it works
///
/// Returns `Ok(None)` if shutdown was signaled first. Errors other than the
/// process not running yet are returned immediately.
pub fn attach_with_retry(
    pid: Option<u32>,
    names: &[&str],
    interval: Duration,
    shutdown: &ShutdownSignal,
) -> Result<Option<ProcessHandle>> {
    let mut announced = false;

    while !shutdown.is_shutdown() {
        match open_process(pid, names) {
            Ok(process) => {
                debug!(
                    "Found {} (pid {}, base {:#x})",
                    process.name, process.pid, process.base_address
                );
                return Ok(Some(process));
            }
            Err(Error::ProcessNotFound(e)) => {
                if !announced {
                    info!("Waiting for {}...", names.join(" / "));
                    announced = true;
                }
                debug!("Process not found: {}", e);
            }
            Err(e) => return Err(e.into()),
        }

        if shutdown.wait(interval) {
            break;
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_stops_on_shutdown() {
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let interval = Duration::from_secs(60);
        let result = attach_with_retry(None, &["NoSuchGame.exe"], interval, &shutdown);
        assert!(result.unwrap().is_none());
    }
}
