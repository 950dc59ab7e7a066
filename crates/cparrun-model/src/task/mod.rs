mod status;
pub use status::TaskStatus;

mod record;
pub use record::TaskRecord;
