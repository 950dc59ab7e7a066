use clap::{ArgAction, Parser};

use cparrun_core::template::{DEFAULT_END_TOKEN, DEFAULT_START_TOKEN};
use cparrun_model::{BatchSpec, Env, KeyValue, ShellMode, SpawnPolicy, timeout_ms_from_secs};
use cparrun_observe::{LoggerConfig, LoggerFormat, LoggerLevel};

const EXAMPLES: &str = r#"EXAMPLES:
  # 3x3 = 9 combinations, printed only
  cparrun --dry-run -- "dig -t %[NS, SOA, MX]% %[google.com, gmail.com, example.com]% +short"

  # run the combinations, 8 at a time; results are JSON on stdout
  cparrun --parallel=8 -- "dig -t %[NS, SOA, MX]% %[google.com, gmail.com]% @1.1.1.1 +short"

  # commands from stdin, failed ones filtered with jq
  printf 'ping -c2 8.8.8.8\nsleep 10\ncurl -s example.com\n' \
    | cparrun --stdin --timeout=2 | jq '.[] | select(.status | contains("ERROR"))'"#;

/// cparrun - combinatorial parallel run of commands, bounded by a timeout.
///
/// Expands a command template into every combination of its `%[a, b]%`
/// alternatives (or reads commands from stdin), runs them in groups of
/// `--parallel`, and prints one JSON result per command in input order.
#[derive(Debug, Parser)]
#[command(name = "cparrun", version, after_help = EXAMPLES)]
pub struct Args {
    /// Number of processes launched together.
    #[arg(short, long, default_value_t = 10)]
    pub parallel: usize,

    /// Deadline for each group of processes, in seconds.
    #[arg(short, long, default_value_t = 10.0, value_name = "SECS")]
    pub timeout: f64,

    /// Marker opening a list of alternatives.
    #[arg(short = 's', long = "start-token", visible_aliases = ["start", "start_token"], default_value = DEFAULT_START_TOKEN)]
    pub start_token: String,

    /// Marker closing a list of alternatives.
    #[arg(short = 'e', long = "end-token", visible_aliases = ["end", "end_token"], default_value = DEFAULT_END_TOKEN)]
    pub end_token: String,

    /// Read commands from stdin, one per line, instead of expanding a template.
    #[arg(short = 'i', long = "stdin", visible_alias = "in")]
    pub stdin: bool,

    /// Skip stdin lines starting with `#`.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub stdin_filter_comments: bool,

    /// Print the commands without running them.
    #[arg(long, visible_alias = "print-only")]
    pub dry_run: bool,

    /// Shell mediation: auto (lines via shell), always, never.
    #[arg(long, default_value_t = ShellMode::Auto, value_name = "MODE")]
    pub shell: ShellMode,

    /// Extra environment variable for every command (repeatable).
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<KeyValue>,

    /// What a failed spawn does: abort the run, or record it per command.
    #[arg(long, default_value = "abort", value_name = "POLICY")]
    pub spawn_errors: SpawnPolicy,

    /// Log filter expression.
    #[arg(long, env = "CPARRUN_LOG", default_value = "warn", value_name = "FILTER")]
    pub log_level: LoggerLevel,

    /// Log output format: text, json, journald.
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub log_format: LoggerFormat,

    /// Command template, e.g. `ping -c1 %[host1, host2]%`. Words are joined by spaces.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "TEMPLATE")]
    pub template: Vec<String>,
}

impl Args {
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            ..Default::default()
        }
    }

    pub fn batch_spec(&self) -> anyhow::Result<BatchSpec> {
        let spec = BatchSpec {
            parallel: self.parallel,
            timeout_ms: timeout_ms_from_secs(self.timeout)?,
            env: self.env.iter().cloned().collect::<Env>(),
            shell: self.shell,
            on_spawn_error: self.spawn_errors,
        };
        spec.validate()?;
        Ok(spec)
    }
}
