//! Waiting for the network before talking to the store.

use std::thread;
use std::time::{Duration, Instant};

/// Poll `probe` until it succeeds or `timeout` elapses.
///
/// The probe runs once immediately and then every `interval`. Returns whether
/// it ever succeeded.
pub fn wait_for_connectivity<P>(mut probe: P, timeout: Duration, interval: Duration) -> bool
where
    P: FnMut() -> bool,
{
    let started = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if probe() {
            log::debug!("online after {attempts} attempt(s)");
            return true;
        }
        let elapsed = started.elapsed();
        if elapsed >= timeout {
            log::warn!("still offline after {}s", timeout.as_secs());
            return false;
        }
        log::info!("waiting for network connection");
        thread::sleep(interval.min(timeout - elapsed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_once_the_probe_succeeds() {
        let mut calls = 0;
        let online = wait_for_connectivity(
            || {
                calls += 1;
                calls == 3
            },
            Duration::from_secs(5),
            Duration::from_millis(1),
        );
        assert!(online);
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_the_timeout() {
        let started = Instant::now();
        let online = wait_for_connectivity(|| false, Duration::from_millis(20), Duration::from_millis(5));
        assert!(!online);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn zero_timeout_still_probes_once() {
        let mut calls = 0;
        let online = wait_for_connectivity(
            || {
                calls += 1;
                false
            },
            Duration::ZERO,
            Duration::from_secs(60),
        );
        assert!(!online);
        assert_eq!(calls, 1);
    }
}
