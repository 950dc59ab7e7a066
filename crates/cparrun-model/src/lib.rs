mod domain;
pub use domain::{Env, KeyValue, TimeoutMs};

mod error;
pub use error::{ModelError, ModelResult};

mod kind;
pub use kind::{CommandForm, CommandSpec, Segment, ShellMode};

mod spec;
pub use spec::{BatchSpec, SpawnPolicy, timeout_ms_from_secs};

mod task;
pub use task::{TaskRecord, TaskStatus};
