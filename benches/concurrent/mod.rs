mod publication;

pub use publication::register_benchmarks;
