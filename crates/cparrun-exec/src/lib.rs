mod error;
pub use error::ExecError;

mod utils;

pub mod subprocess;

pub mod batch;
pub use batch::{BatchScheduler, run_batch};
