mod logger;
mod time;


pub use logger::setup_logger;
pub use time::monotonic_nanos;
