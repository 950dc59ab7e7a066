mod batch;
pub use batch::{BatchSpec, SpawnPolicy, timeout_ms_from_secs};
