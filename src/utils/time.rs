use std::sync::OnceLock;
use std::time::Instant;

static CLOCK_ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Returns monotonic nanoseconds elapsed since the first call in this process.
///
/// Values never go backwards and are only comparable within one process, which
/// is all order acceptance, trade and snapshot timestamps need.
pub fn monotonic_nanos() -> u64 {
    let origin = CLOCK_ORIGIN.get_or_init(Instant::now);
    u64::try_from(origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
}
