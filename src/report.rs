//! The vehicle report printed by the `can_we_talk` binary: three sequential PID reads, each either printed or reported as
//! unreadable.
use std::io::Write;

use tracing::warn;

use crate::can::CanAdapter;
use crate::obd::{ObdClient, Pid};
use crate::{Error, Result};

/// PIDs queried for the report, in order
pub const REPORT_PIDS: [Pid; 3] = [Pid::ObdStandard, Pid::FuelTankLevel, Pid::RunTimeSinceEngineStart];

/// Outcome counts of a report run
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Summary {
    pub read: usize,
    pub unavailable: usize,
}

/// Query every PID in [`REPORT_PIDS`] and write one line per PID to `out`.
///
/// Missing and malformed replies become "unable to read" lines, the run carries on with the next PID. Transport errors
/// abort the run.
pub fn run<T: CanAdapter, W: Write>(client: &mut ObdClient<T>, out: &mut W) -> Result<Summary> {
    let mut summary = Summary::default();

    for pid in REPORT_PIDS {
        match client.read(pid) {
            Ok(Some(value)) => {
                writeln!(out, "{}: {}", pid.label(), value)?;
                summary.read += 1;
            }
            Ok(None) => {
                writeln!(out, "unable to read {}", pid)?;
                summary.unavailable += 1;
            }
            Err(Error::ObdError(e)) => {
                warn!("Reply for {} rejected: {}", pid, e);
                writeln!(out, "unable to read {}", pid)?;
                summary.unavailable += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}
