//! Run command - backport every pending nominated commit

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize, arrow};
use crate::cli::{Cli, CliProgress};
use anstream::println;
use dialoguer::Confirm;
use stable_pick::error::{Error, Result};
use stable_pick::ledger::CommitLedger;
use stable_pick::pick::{PickPlan, Sequencer, create_pick_plan};
use stable_pick::types::RunSummary;

/// Options for the run command
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Show what would be processed without making changes
    pub dry_run: bool,
    /// Preview the plan and prompt for confirmation before executing
    pub confirm: bool,
}

impl From<&Cli> for RunOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            dry_run: cli.dry_run,
            confirm: cli.confirm,
        }
    }
}

/// Run the pick command
pub async fn run_pick(cli: &Cli) -> Result<()> {
    let options = RunOptions::from(cli);
    let ctx = CommandContext::new(cli)?;

    println!(
        "{} {} {}",
        "Picking onto".emphasis(),
        ctx.staging_branch.accent(),
        format!("({})", ctx.repo_root.display()).muted()
    );

    let progress = CliProgress::new();
    let sequencer = Sequencer::new(ctx.adapters(), &progress, ctx.sequencer_options());

    if !options.dry_run {
        sequencer.sanity_check().await?;
    }

    if options.dry_run || options.confirm {
        let commits = ctx.ledger.load().await?;
        let plan = create_pick_plan(&commits);
        print_plan(&plan);

        if options.dry_run {
            println!("{}", "Dry run complete".muted());
            return Ok(());
        }
        if plan.is_empty() {
            return Ok(());
        }
        if !Confirm::new()
            .with_prompt("Proceed?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    let summary = sequencer.process_pending().await?;

    print_summary(&summary);
    Ok(())
}

/// Print the processing order
fn print_plan(plan: &PickPlan) {
    println!("{}:", "Pick plan".emphasis());
    println!();

    if plan.is_empty() {
        println!("  {}", "No nominated commits to pick".muted());
        println!();
        return;
    }

    for pick in &plan.picks {
        println!("  {} {}: {}", arrow(), pick.sha.accent(), pick.description);
        if let Some(after) = &pick.after {
            println!("      {}", format!("skipped if {after} fails").muted());
        }
    }
    println!();
}

/// Print the end-of-run summary
fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "{} {} merged, {} need manual resolution, {} skipped",
        format!("{CHECK} Run complete:").success(),
        summary.merged().len().accent(),
        summary.manual().len().accent(),
        summary.cascaded().len().accent()
    );

    let manual = summary.manual();
    if !manual.is_empty() {
        println!("   {} {}", "Manual:".warn(), manual.join(", "));
    }
    let cascaded = summary.cascaded();
    if !cascaded.is_empty() {
        println!("   {} {}", "Skipped:".muted(), cascaded.join(", ").muted());
    }
}
