//! Advisory process-wide resource ceilings.
//!
//! Applied once per `process` call and idempotent to re-apply. These are
//! best-effort hints to the OS (setrlimit on unix, nothing elsewhere) — a
//! long-running decode is bounded by the CPU ceiling, not cancelled by the
//! pipeline. Failures to apply are ignored: the limits tune the environment,
//! they are not part of the rendering contract.

use crate::config::ResourceLimits;

/// Apply the configured ceilings to the current process.
pub fn apply(limits: &ResourceLimits) {
    #[cfg(unix)]
    apply_unix(limits);
    #[cfg(not(unix))]
    let _ = limits;
}

#[cfg(unix)]
fn apply_unix(limits: &ResourceLimits) {
    use libc::{RLIM_INFINITY, RLIMIT_AS, RLIMIT_CPU, getrlimit, rlimit, setrlimit};

    if let Some(mb) = limits.max_memory_mb {
        let want = mb.saturating_mul(1024 * 1024) as libc::rlim_t;
        let mut current = rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // Only ever raises the address-space ceiling, and never past the hard
        // limit. An unlimited process is left alone.
        if unsafe { getrlimit(RLIMIT_AS, &mut current) } == 0
            && current.rlim_cur != RLIM_INFINITY
            && current.rlim_cur < want
        {
            let next = rlimit {
                rlim_cur: if current.rlim_max == RLIM_INFINITY {
                    want
                } else {
                    want.min(current.rlim_max)
                },
                rlim_max: current.rlim_max,
            };
            unsafe { setrlimit(RLIMIT_AS, &next) };
        }
    }

    if let Some(secs) = limits.max_time_secs {
        let want = secs as libc::rlim_t;
        let mut current = rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        if unsafe { getrlimit(RLIMIT_CPU, &mut current) } == 0 {
            let next = rlimit {
                rlim_cur: if current.rlim_max == RLIM_INFINITY {
                    want
                } else {
                    want.min(current.rlim_max)
                },
                rlim_max: current.rlim_max,
            };
            unsafe { setrlimit(RLIMIT_CPU, &next) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_limits_are_a_no_op() {
        apply(&ResourceLimits::default());
    }

    #[test]
    fn reapplying_is_safe() {
        let limits = ResourceLimits {
            max_memory_mb: Some(4096),
            max_time_secs: None,
        };
        apply(&limits);
        apply(&limits);
    }
}
