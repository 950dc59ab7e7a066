mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

/// Timeout value in milliseconds.
///
/// Used for the per-group wall-clock deadline of a batch run.
pub type TimeoutMs = u64;
