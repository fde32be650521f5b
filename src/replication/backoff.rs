use rand::Rng;

/// Ceiling for one retry timeout, in seconds. Growth is geometric until the
/// schedule hits this cap, after which the jitter is applied downward so the
/// worst-case delay stays bounded.
const TIMEOUT_CEILING: f64 = 300.0;

/// Timeout for retry attempt `attempt` (0-based), in seconds.
///
/// The base step is one hundredth of the heartbeat interval, doubled every
/// attempt and capped at 300s. A random jitter of up to 10% is added while
/// below the cap and subtracted once at it. Rounded to 4 decimal places.
pub fn retry_timeout<R: Rng>(attempt: u32, heartbeat_secs: f64, rng: &mut R) -> f64 {
    let step = heartbeat_secs / 100.0;
    let main = (step * 2f64.powi(attempt.min(1024) as i32)).min(TIMEOUT_CEILING);
    let jitter = rng.gen::<f64>() * main * 0.1;

    if main < TIMEOUT_CEILING {
        round4(main + jitter)
    } else {
        round4(main - jitter)
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
