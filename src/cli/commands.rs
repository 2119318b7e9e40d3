//! Subcommand handlers.

#![expect(clippy::print_stdout, reason = "command output goes to stdout")]

use std::{thread, time::Duration};

use anyhow::{Context, Result, ensure};
use cli_defs::{DemoArgs, LoadArgs, SendArgs, WriteExamplesArgs};
use tracing::warn;

use crate::{
    command::{Action, Params},
    deploy::DeployPlan,
    script::{self, RunSummary, StepOutcome, StepStatus, examples},
    session::{Session, SessionConfig},
};

fn connect(cfg: &SessionConfig) -> Result<Session> {
    let mut session = Session::new(cfg.clone());
    session
        .connect()
        .with_context(|| format!("cannot reach runtime at {}", cfg.endpoint))?;
    Ok(session)
}

/// List function blocks.
pub(super) fn query(cfg: &SessionConfig) -> Result<()> {
    let mut session = connect(cfg)?;
    let response = session
        .send(&Action::Query, &Params::new())
        .context("QUERY failed")?;
    println!("{}", response.text());
    Ok(())
}

/// Send one command built from `key=value` arguments.
pub(super) fn send(cfg: &SessionConfig, args: &SendArgs) -> Result<()> {
    let action = Action::from(args.action.as_str());
    let params = Params::from_pairs(&args.params).context("invalid command parameters")?;
    let mut session = connect(cfg)?;
    let response = session
        .send(&action, &params)
        .with_context(|| format!("{action} failed"))?;
    println!("{}", response.text());
    if let Some(reason) = response.reason() {
        anyhow::bail!("runtime rejected {action}: {reason}");
    }
    Ok(())
}

fn describe(status: &StepStatus) -> String {
    match status {
        StepStatus::Dispatched {
            request_id,
            reply_id,
            response,
        } => format!("ok (#{}) {response}", reply_id.unwrap_or(*request_id)),
        StepStatus::Failed { error } => format!("FAILED {error}"),
        StepStatus::Skipped => "skipped".to_owned(),
    }
}

fn print_outcome(outcome: &StepOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
    } else {
        println!(
            "[{:>3}] {:<17} {}",
            outcome.line,
            outcome.classification,
            describe(&outcome.status)
        );
    }
    Ok(())
}

/// Run a load script, online or as a dry run.
pub(super) fn load(cfg: &SessionConfig, args: &LoadArgs) -> Result<()> {
    let lines = script::load_script(&args.file)?;
    let mut session = if args.dry_run {
        None
    } else {
        Some(connect(cfg)?)
    };
    let outcomes = script::run_with_progress(&lines, session.as_mut(), |outcome| {
        if let Err(err) = print_outcome(outcome, args.json) {
            warn!(error = %err, line = outcome.line, "failed to print step outcome");
        }
    });
    let summary = RunSummary::from_outcomes(&outcomes);
    if !args.json {
        println!("{}: {summary}", args.file);
    }
    ensure!(
        summary.is_success(),
        "{} of {} steps failed",
        summary.failed,
        outcomes.len()
    );
    Ok(())
}

fn render_offline(plan: &DeployPlan, session: &Session) -> Result<()> {
    for step in plan.render(session)? {
        println!("{}", step.label);
        println!("  {}", step.document);
    }
    println!("(offline: commands were rendered but not sent)");
    Ok(())
}

fn run_live(plan: &DeployPlan, session: &mut Session, pace: Duration) -> Result<()> {
    let results = plan.execute_with(session, |step, result| {
        println!("{}", step.label);
        match result {
            Ok(response) => println!("  -> {}", response.text()),
            Err(err) => println!("  !! {err}"),
        }
        thread::sleep(pace);
    });
    let failed = results.iter().filter(|r| r.is_err()).count();
    ensure!(failed == 0, "{failed} of {} steps failed", results.len());
    Ok(())
}

/// Deploy the timer and counter program, or show it when connecting fails
/// for any reason.
pub(super) fn demo(cfg: &SessionConfig, args: &DemoArgs) -> Result<()> {
    let plan = DeployPlan::timer_counter(&args.resource);
    println!("{} on {} ({} steps)", plan.name, args.resource, plan.steps.len());
    let mut session = Session::new(cfg.clone());
    match session.connect() {
        Ok(()) => run_live(&plan, &mut session, Duration::from_millis(args.pace_ms)),
        Err(err) => {
            warn!(error = %err, "runtime unreachable; rendering plan offline");
            render_offline(&plan, &session)
        }
    }
}

/// Write the sample load scripts.
pub(super) fn write_examples(args: &WriteExamplesArgs) -> Result<()> {
    for path in examples::write_examples(&args.dir)? {
        println!("wrote {path}");
    }
    Ok(())
}
