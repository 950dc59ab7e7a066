//! Synchronous batch scheduler.
//!
//! Commands are cut into consecutive groups of `parallel` commands. A group is
//! spawned at once and must fully resolve (every task exited or killed on the
//! deadline) before the next group starts, so peak concurrency never exceeds
//! `parallel`.
//!
//! Each child is owned by a supervisor task that posts one [`TaskEvent`] on a
//! channel. The controller (this module) is the only writer of result slots and
//! fills slot `i` for command `i`, regardless of completion order.
use tokio::{sync::mpsc, time};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, trace, warn};

use cparrun_core::runner::{RunContext, TaskIds};
use cparrun_model::{BatchSpec, CommandSpec, Env, SpawnPolicy, TaskRecord};

use crate::{
    ExecError,
    subprocess::{Outcome, TaskEvent, build_command, supervise},
};

/// Run `commands` with `spec` under `ctx`.
///
/// Shorthand for [`BatchScheduler::new`] followed by [`BatchScheduler::run`].
pub async fn run_batch(
    commands: &[CommandSpec],
    spec: BatchSpec,
    ctx: &RunContext,
) -> Result<Vec<TaskRecord>, ExecError> {
    BatchScheduler::new(spec)?.run(commands, ctx).await
}

/// Executes command lists group by group under a validated [`BatchSpec`].
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    spec: BatchSpec,
}

impl BatchScheduler {
    pub fn new(spec: BatchSpec) -> Result<Self, ExecError> {
        spec.validate()
            .map_err(|e| ExecError::InvalidConfig(e.to_string()))?;
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &BatchSpec {
        &self.spec
    }

    /// Run every command and return one terminal record per command, in input order.
    ///
    /// Non-zero exits and timeouts are recorded per task. A spawn failure aborts
    /// the run under [`SpawnPolicy::Abort`] (already running processes of the
    /// group are killed first) and is recorded per task under
    /// [`SpawnPolicy::Record`].
    pub async fn run(
        &self,
        commands: &[CommandSpec],
        ctx: &RunContext,
    ) -> Result<Vec<TaskRecord>, ExecError> {
        self.run_groups(commands, ctx)
            .instrument(ctx.span().clone())
            .await
    }

    async fn run_groups(
        &self,
        commands: &[CommandSpec],
        ctx: &RunContext,
    ) -> Result<Vec<TaskRecord>, ExecError> {
        let env = ctx.env().merged(&self.spec.env);
        let parallel = self.spec.parallel;
        let groups = commands.len().div_ceil(parallel);
        let mut ids = TaskIds::new();
        let mut slots: Vec<Option<TaskRecord>> = vec![None; commands.len()];

        info!(
            commands = commands.len(),
            groups,
            parallel,
            timeout_ms = self.spec.timeout_ms,
            shell = %self.spec.shell,
            "batch run started",
        );

        for (group, chunk) in commands.chunks(parallel).enumerate() {
            let first = group * parallel;
            debug!(group, first, size = chunk.len(), "group started");
            self.run_group(first, chunk, &env, &mut ids, &mut slots)
                .await?;
            debug!(group, "group resolved");
        }

        let records = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Some(record) if record.status().is_terminal() => Ok(record),
                _ => Err(ExecError::Internal(format!("task #{index} was never resolved"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let failed = records.iter().filter(|r| r.status().is_error()).count();
        info!(tasks = records.len(), failed, "batch run finished");
        Ok(records)
    }

    async fn run_group(
        &self,
        first: usize,
        chunk: &[CommandSpec],
        env: &Env,
        ids: &mut TaskIds,
        slots: &mut [Option<TaskRecord>],
    ) -> Result<(), ExecError> {
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<TaskEvent>();
        let mut pending = 0usize;

        for (offset, command) in chunk.iter().enumerate() {
            let index = first + offset;
            let task_id = ids.next_id();
            let use_shell = self.spec.shell.use_shell(command);

            let spawned = build_command(index, command, use_shell, env).and_then(|mut cmd| {
                cmd.spawn().map_err(|source| ExecError::Spawn {
                    index,
                    command: command.to_string(),
                    source,
                })
            });

            match spawned {
                Ok(child) => {
                    trace!(index, task = %task_id, pid = ?child.id(), use_shell, "task spawned");
                    slots[index] = Some(TaskRecord::running(task_id, command.clone()));
                    tokio::spawn(
                        supervise(index, child, cancel.child_token(), tx.clone())
                            .in_current_span(),
                    );
                    pending += 1;
                }
                Err(e) if self.spec.on_spawn_error == SpawnPolicy::Record => {
                    warn!(index, task = %task_id, "spawn failed, recording: {e}");
                    slots[index] = Some(TaskRecord::spawn_failed(
                        task_id,
                        command.clone(),
                        e.to_string(),
                    ));
                }
                Err(e) => {
                    error!(index, running = pending, "spawn failed, aborting run: {e}");
                    cancel.cancel();
                    drop(tx);
                    // Supervisors kill and reap their children before reporting.
                    while rx.recv().await.is_some() {}
                    return Err(e);
                }
            }
        }
        drop(tx);

        let deadline = time::sleep(self.spec.timeout());
        tokio::pin!(deadline);

        while pending > 0 {
            tokio::select! {
                event = rx.recv() => {
                    let Some(TaskEvent { index, outcome }) = event else {
                        return Err(ExecError::Internal(format!(
                            "{pending} supervisor(s) exited without reporting"
                        )));
                    };
                    pending -= 1;
                    let record = slots[index].as_mut().ok_or_else(|| {
                        ExecError::Internal(format!("event for unknown task #{index}"))
                    })?;
                    apply(record, outcome)?;
                    debug!(index, task = record.task_id(), status = %record.status(), "task resolved");
                }
                _ = &mut deadline, if !cancel.is_cancelled() => {
                    warn!(pending, timeout_ms = self.spec.timeout_ms, "group deadline reached; terminating remaining tasks");
                    cancel.cancel();
                }
            }
        }
        Ok(())
    }
}

fn apply(record: &mut TaskRecord, outcome: Outcome) -> Result<(), ExecError> {
    let res = match outcome {
        Outcome::Exited {
            stdout,
            stderr,
            code,
        } => record.finish(stdout, stderr, code),
        Outcome::TimedOut => record.time_out(),
        Outcome::Failed(reason) => record.fail(reason),
    };
    res.map_err(|e| ExecError::Internal(e.to_string()))
}

#[cfg(all(test, unix))]
mod tests {
    use std::{
        collections::HashSet,
        time::{Duration, Instant},
    };

    use super::*;
    use cparrun_model::{ShellMode, TaskStatus};

    fn spec(parallel: usize, timeout_ms: u64) -> BatchSpec {
        BatchSpec {
            parallel,
            timeout_ms,
            ..Default::default()
        }
    }

    fn lines(cmds: &[&str]) -> Vec<CommandSpec> {
        cmds.iter().map(|c| CommandSpec::line(*c)).collect()
    }

    #[tokio::test]
    async fn empty_list_yields_empty_result() {
        let out = run_batch(&[], spec(2, 1_000), &RunContext::default())
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_spec_is_rejected() {
        let err = BatchScheduler::new(spec(0, 1_000)).unwrap_err();
        assert!(matches!(err, ExecError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn results_follow_input_order() {
        // Later commands finish first within each group.
        let commands = lines(&[
            "sleep 0.4; echo 0",
            "echo 1",
            "sleep 0.3; echo 2",
            "echo 3",
            "echo 4",
        ]);
        let out = run_batch(&commands, spec(2, 5_000), &RunContext::default())
            .await
            .unwrap();

        assert_eq!(out.len(), 5);
        for (i, record) in out.iter().enumerate() {
            assert_eq!(record.command(), &commands[i]);
            assert_eq!(record.status(), TaskStatus::OkFinished);
            assert_eq!(record.stdout(), Some(format!("{i}\n").as_str()));
            assert_eq!(record.return_code(), Some(0));
        }

        let ids: HashSet<_> = out.iter().map(|r| r.task_id().to_string()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn slow_task_times_out_and_fast_one_finishes() {
        let commands = lines(&["sleep 30", "echo fast"]);
        let started = Instant::now();
        let out = run_batch(&commands, spec(2, 300), &RunContext::default())
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));

        assert_eq!(out[0].status(), TaskStatus::ErrorTerminatedTimeout);
        assert!(out[0].stdout().is_none());
        assert!(out[0].stderr().is_none());
        assert!(out[0].return_code().is_none());

        assert_eq!(out[1].status(), TaskStatus::OkFinished);
        assert_eq!(out[1].stdout(), Some("fast\n"));
    }

    #[tokio::test]
    async fn next_group_starts_after_timeout() {
        let commands = lines(&["sleep 30", "echo after"]);
        let out = run_batch(&commands, spec(1, 200), &RunContext::default())
            .await
            .unwrap();

        assert_eq!(out[0].status(), TaskStatus::ErrorTerminatedTimeout);
        assert_eq!(out[1].status(), TaskStatus::OkFinished);
        assert_eq!(out[1].stdout(), Some("after\n"));
    }

    #[tokio::test]
    async fn groups_never_overlap() {
        // Each task appends a start and end marker; with parallel=1 they cannot interleave.
        let log = std::env::temp_dir().join(format!("cparrun-overlap-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&log);
        let script = |n: u32| {
            format!(
                "echo s{n} >> {p}; sleep 0.1; echo e{n} >> {p}",
                p = log.display()
            )
        };
        let commands: Vec<CommandSpec> = (0..3).map(|n| CommandSpec::line(script(n))).collect();

        run_batch(&commands, spec(1, 5_000), &RunContext::default())
            .await
            .unwrap();

        let written = std::fs::read_to_string(&log).unwrap();
        let _ = std::fs::remove_file(&log);
        assert_eq!(written, "s0\ne0\ns1\ne1\ns2\ne2\n");
    }

    #[tokio::test]
    async fn groups_resolve_before_next_group_starts() {
        // parallel=2 over 5 commands: groups {0,1}, {2,3}, {4}. Task 3 is killed on the deadline.
        let log = std::env::temp_dir().join(format!("cparrun-groups-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&log);
        let script = |n: usize| {
            let pause = if n == 3 { "30" } else { "0.3" };
            format!(
                "echo s{n} >> {p}; sleep {pause}; echo e{n} >> {p}",
                p = log.display()
            )
        };
        let commands: Vec<CommandSpec> = (0..5).map(|n| CommandSpec::line(script(n))).collect();

        let out = run_batch(&commands, spec(2, 1_500), &RunContext::default())
            .await
            .unwrap();

        let written = std::fs::read_to_string(&log).unwrap();
        let _ = std::fs::remove_file(&log);
        let markers: Vec<(char, usize)> = written
            .lines()
            .map(|l| (l.as_bytes()[0] as char, l[1..].parse().unwrap()))
            .collect();

        let group_order: Vec<usize> = markers.iter().map(|(_, n)| n / 2).collect();
        let mut sorted = group_order.clone();
        sorted.sort();
        assert_eq!(group_order, sorted, "groups interleaved: {written:?}");

        // Members of a group run side by side.
        let pos = |m: (char, usize)| markers.iter().position(|&x| x == m).unwrap();
        assert!(pos(('s', 1)) < pos(('e', 0)));
        assert!(pos(('s', 0)) < pos(('e', 1)));

        assert!(!markers.contains(&('e', 3)));
        assert_eq!(markers.len(), 9);
        assert_eq!(out[3].status(), TaskStatus::ErrorTerminatedTimeout);
        for i in [0, 1, 2, 4] {
            assert_eq!(out[i].status(), TaskStatus::OkFinished);
        }
    }

    #[tokio::test]
    async fn timeout_kills_background_job_of_exited_shell() {
        let marker = std::env::temp_dir().join(format!("cparrun-bg-{}", std::process::id()));
        let _ = std::fs::remove_file(&marker);
        let line = format!("sh -c 'sleep 1; touch {}' & echo hi", marker.display());

        let out = run_batch(&lines(&[line.as_str()]), spec(1, 300), &RunContext::default())
            .await
            .unwrap();
        assert_eq!(out[0].status(), TaskStatus::ErrorTerminatedTimeout);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(!marker.exists(), "background job outlived its task");
    }

    #[tokio::test]
    async fn non_zero_exit_is_isolated() {
        let commands = lines(&["echo oops >&2; exit 3", "echo ok"]);
        let out = run_batch(&commands, spec(2, 5_000), &RunContext::default())
            .await
            .unwrap();

        assert_eq!(out[0].status(), TaskStatus::ErrorFinished);
        assert_eq!(out[0].return_code(), Some(3));
        assert_eq!(out[0].stderr(), Some("oops\n"));
        assert_eq!(out[1].status(), TaskStatus::OkFinished);
    }

    #[tokio::test]
    async fn argv_commands_run_without_shell() {
        let commands = vec![CommandSpec::argv(["echo", "$HOME", "a  b"])];
        let out = run_batch(&commands, spec(1, 5_000), &RunContext::default())
            .await
            .unwrap();
        assert_eq!(out[0].stdout(), Some("$HOME a  b\n"));
    }

    #[tokio::test]
    async fn batch_env_overrides_context_env() {
        let mut ctx_env = Env::new();
        ctx_env.push("CPARRUN_BASE", "base");
        ctx_env.push("CPARRUN_MODE", "ctx");
        let ctx = RunContext::default().with_env(ctx_env);

        let batch = BatchSpec {
            env: Env::single("CPARRUN_MODE", "batch"),
            ..spec(1, 5_000)
        };
        let out = run_batch(&lines(&["echo $CPARRUN_BASE-$CPARRUN_MODE"]), batch, &ctx)
            .await
            .unwrap();
        assert_eq!(out[0].stdout(), Some("base-batch\n"));
    }

    #[tokio::test]
    async fn spawn_failure_aborts_run_and_kills_group() {
        let commands = vec![
            CommandSpec::line("sleep 30"),
            CommandSpec::argv(["/nonexistent/cparrun-missing-binary"]),
        ];
        let started = Instant::now();
        let err = run_batch(&commands, spec(2, 60_000), &RunContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::Spawn { index: 1, .. }), "{err}");
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn spawn_failure_can_be_recorded_per_task() {
        let commands = vec![
            CommandSpec::argv(["/nonexistent/cparrun-missing-binary"]),
            CommandSpec::line("echo still-runs"),
        ];
        let batch = BatchSpec {
            on_spawn_error: SpawnPolicy::Record,
            ..spec(2, 5_000)
        };
        let out = run_batch(&commands, batch, &RunContext::default())
            .await
            .unwrap();

        assert_eq!(out[0].status(), TaskStatus::ErrorSpawnFailed);
        assert!(out[0].stderr().is_some());
        assert!(out[0].return_code().is_none());
        assert_eq!(out[1].status(), TaskStatus::OkFinished);
        assert_eq!(out[1].stdout(), Some("still-runs\n"));
    }

    #[tokio::test]
    async fn explicit_shell_mode_is_honored() {
        let batch = BatchSpec {
            shell: ShellMode::Always,
            ..spec(1, 5_000)
        };
        let out = run_batch(
            &[CommandSpec::argv(["echo", "$CPARRUN_SHELL_TEST"])],
            BatchSpec {
                env: Env::single("CPARRUN_SHELL_TEST", "expanded"),
                ..batch
            },
            &RunContext::default(),
        )
        .await
        .unwrap();
        assert_eq!(out[0].stdout(), Some("expanded\n"));
    }
}
