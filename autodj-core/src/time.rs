//! Hour-bucket arithmetic
//!
//! The flowsheet service groups entries by the hour of the show they belong
//! to, expressed as Unix milliseconds of the hour's first second.

const SECONDS_PER_HOUR: u64 = 3_600;

/// Truncate a Unix-seconds reading to the start of its hour, in milliseconds
///
/// Returns 0 for an input of 0, which callers treat as "wall clock unknown".
///
/// ```rust
/// use autodj_core::current_hour_ms;
///
/// // Mon Jan 15 2024 17:30:00 UTC
/// assert_eq!(current_hour_ms(1_705_347_000), 1_705_345_200_000);
/// assert_eq!(current_hour_ms(0), 0);
/// ```
pub fn current_hour_ms(epoch_seconds: u64) -> u64 {
    if epoch_seconds == 0 {
        return 0;
    }
    let hour_start = epoch_seconds - epoch_seconds % SECONDS_PER_HOUR;
    hour_start.saturating_mul(1_000)
}
