mod app;
mod cli;
mod input;
mod output;

use clap::Parser;

use cparrun_observe::{init_local_offset, scoped_logger};

use crate::cli::Args;

fn main() -> anyhow::Result<()> {
    // Must run before any thread exists.
    init_local_offset();

    let args = Args::parse();
    let _log = scoped_logger(&args.logger_config())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(app::run(args))
}
