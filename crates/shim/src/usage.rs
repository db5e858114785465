//! Wall-clock and CPU accounting for a wrapped invocation

use chrono::{DateTime, Utc};
use std::fmt;
use std::process::ExitStatus;
use std::time::Duration;

/// Seconds plus microseconds, rendered as `<sec>.<usec>` with six digits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timeval {
    pub secs: i64,
    pub micros: u32,
}

impl Timeval {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            secs: dt.timestamp(),
            // chrono folds a leap second into the sub-second part
            micros: dt.timestamp_subsec_micros().min(999_999),
        }
    }

    pub fn as_micros(&self) -> i128 {
        i128::from(self.secs) * 1_000_000 + i128::from(self.micros)
    }
}

impl fmt::Display for Timeval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs, self.micros)
    }
}

/// Everything the end record reports, captured after the child exits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageRecord {
    pub start: Timeval,
    pub end: Timeval,
    pub exit_code: i32,
    pub user_time: Timeval,
    pub system_time: Timeval,
}

impl UsageRecord {
    /// Wall-clock time between start and end, zero if the clock went backwards
    pub fn elapsed(&self) -> Duration {
        let micros = (self.end.as_micros() - self.start.as_micros()).max(0);
        Duration::from_micros(u64::try_from(micros).unwrap_or(u64::MAX))
    }
}

/// Exit code the wrapper reports for a child status.
///
/// Unix processes killed by a signal map to 128 + signal, as shells do.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    status.code().unwrap_or(1)
}

/// User and system CPU time of waited-for children of this process.
///
/// The wrapper waits for exactly one child, so this is that child's usage.
#[cfg(unix)]
pub fn child_cpu_times() -> (Timeval, Timeval) {
    use nix::sys::resource::{getrusage, UsageWho};
    use nix::sys::time::TimeVal;

    fn convert(tv: TimeVal) -> Timeval {
        Timeval {
            secs: tv.tv_sec() as i64,
            micros: u32::try_from(tv.tv_usec()).unwrap_or(0),
        }
    }

    cpu_times_or_zero(
        getrusage(UsageWho::RUSAGE_CHILDREN)
            .map(|usage| (convert(usage.user_time()), convert(usage.system_time()))),
    )
}

#[cfg(not(unix))]
pub fn child_cpu_times() -> (Timeval, Timeval) {
    (Timeval::default(), Timeval::default())
}

/// The child has already been reaped when usage is read, so its exit code and
/// end record must still be reported. A failed read becomes zero CPU time
/// with a warning instead of an error.
#[cfg(any(unix, test))]
fn cpu_times_or_zero<E: std::fmt::Display>(
    result: std::result::Result<(Timeval, Timeval), E>,
) -> (Timeval, Timeval) {
    result.unwrap_or_else(|err| {
        log::warn!("could not read child CPU usage, reporting zero: {err}");
        (Timeval::default(), Timeval::default())
    })
}
