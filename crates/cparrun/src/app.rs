use std::io;

use anyhow::{Context, bail};
use tracing::{debug, info_span};

use cparrun_core::{
    runner::RunContext,
    template::{TemplateParser, collapse, combination_count, expand},
};
use cparrun_exec::run_batch;
use cparrun_model::{CommandForm, CommandSpec, Env};

use crate::{cli::Args, input, output};

/// Resolve the command list, then print it (dry run) or run it and print results.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let commands = if args.stdin {
        let lines = input::read_commands(io::stdin().lock(), args.stdin_filter_comments)
            .context("failed to read commands from stdin")?;
        lines.into_iter().map(CommandSpec::Line).collect()
    } else {
        expand_template(&args)?
    };

    if args.dry_run {
        eprintln!("[DRY RUN] List of commands:");
        output::write_commands(io::stdout().lock(), &commands)?;
        return Ok(());
    }

    let spec = args.batch_spec()?;
    let span = info_span!("batch", commands = commands.len(), parallel = spec.parallel);
    let ctx = RunContext::new(Env::new(), span);

    let results = run_batch(&commands, spec, &ctx)
        .await
        .context("batch run aborted")?;
    output::write_results(io::stdout().lock(), &results)?;
    Ok(())
}

fn expand_template(args: &Args) -> anyhow::Result<Vec<CommandSpec>> {
    if args.template.is_empty() {
        bail!("no command template given; pass it after `--` or use --stdin");
    }
    let template = args.template.join(" ");

    let segments = TemplateParser::new(&args.start_token, &args.end_token)
        .parse(&template)
        .with_context(|| format!("invalid template: {template}"))?;
    debug!(
        segments = segments.len(),
        combinations = ?combination_count(&segments),
        "template parsed",
    );
    Ok(collapse(expand(&segments), CommandForm::Line))
}
