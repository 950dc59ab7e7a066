//! Per-run plumbing shared by everything that executes a batch.
mod context;
pub use context::RunContext;

mod id;
pub use id::{TASK_ID_LEN, TaskIds, random_task_id};
