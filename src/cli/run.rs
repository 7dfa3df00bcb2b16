//! Combine command - select candidates and publish the combined PR

use crate::cli::context::{CommandContext, output_path};
use crate::cli::style::{CHECK, CROSS, Stylize, WARN};
use crate::cli::{Cli, report_error};
use anstream::println;
use anyhow::Result;
use combine_prs::config::{CombineConfig, load_config_file};
use combine_prs::platform::PlatformService;
use combine_prs::report::{RunOutcome, write_outputs};
use combine_prs::select::SelectionOutcome;
use std::path::Path;
use std::process::ExitCode;

/// Run the combine command
pub async fn run_combine(cli: Cli) -> Result<ExitCode> {
    // Resolve configuration before anything touches the network
    let file_inputs = match cli.config.as_deref().map(load_config_file).transpose() {
        Ok(inputs) => inputs.unwrap_or_default(),
        Err(e) => {
            let outcome = RunOutcome::ConfigurationError(e.to_string());
            return finish(&outcome, output_path().as_deref());
        }
    };
    let inputs = file_inputs.overlay(cli.inputs.into());

    let config = match CombineConfig::from_inputs(inputs) {
        Ok(config) => config,
        Err(e) => {
            let outcome = RunOutcome::from_config_error(e)?;
            return finish(&outcome, output_path().as_deref());
        }
    };

    let ctx = match CommandContext::new(
        cli.repo.as_deref(),
        cli.token.as_deref(),
        cli.api_url.as_deref(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            let outcome = RunOutcome::Aborted(format!("{e:#}"));
            return finish(&outcome, output_path().as_deref());
        }
    };

    if cli.dry_run {
        return run_dry(&config, ctx.platform.as_ref()).await;
    }

    let outcome = combine_prs::run(&config, ctx.platform.as_ref())
        .await
        .unwrap_or_else(|e| RunOutcome::Aborted(e.to_string()));
    finish(&outcome, ctx.output_path.as_deref())
}

/// Print the outcome, write action outputs, and pick the exit code
fn finish(outcome: &RunOutcome, output_path: Option<&Path>) -> Result<ExitCode> {
    print_outcome(outcome);

    if let Some(path) = output_path {
        write_outputs(path, outcome)?;
    }

    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Success {
            pr_number,
            pr_url,
            pr_state,
            merged,
            conflicted,
        } => {
            println!(
                "{} Combined PR {} {pr_state}: {}",
                CHECK.success(),
                format!("#{pr_number}").accent(),
                pr_url.accent()
            );
            println!("   {} merged", merged.accent());
            if *conflicted > 0 {
                println!(
                    "   {} {} left out due to merge conflicts",
                    WARN.warn(),
                    conflicted.warn()
                );
            }
        }
        RunOutcome::NoCandidates => println!("{}", outcome.status().muted()),
        RunOutcome::InsufficientCandidates { found, required } => {
            println!(
                "{} ({found} found, {required} required)",
                outcome.status().muted()
            );
        }
        RunOutcome::ConfigurationError(message) | RunOutcome::Aborted(message) => {
            report_error(message);
        }
        RunOutcome::BranchCreateFailed(message) => {
            report_error(outcome.status());
            println!("   {}", message.muted());
        }
        RunOutcome::PrCreateFailed { message, hint } => {
            report_error(outcome.status());
            println!("   {}", message.muted());
            if let Some(hint) = hint {
                println!("   {} {}", "hint:".emphasis(), hint);
            }
        }
    }
}

/// Select candidates and print the plan without writing anything
async fn run_dry(config: &CombineConfig, platform: &dyn PlatformService) -> Result<ExitCode> {
    let selection = combine_prs::plan_run(config, platform).await?;

    println!("{}:", "Combine plan".emphasis());
    println!();
    match selection {
        SelectionOutcome::NoCandidates => {
            println!("  {}", "No PRs/branches matched criteria".muted());
        }
        SelectionOutcome::InsufficientCandidates { found, required } => {
            println!(
                "  {} {found} matched, {required} required",
                CROSS.warn()
            );
        }
        SelectionOutcome::Plan(plan) => {
            println!(
                "  {} -> {} (from {})",
                config.combine_branch_name.accent(),
                plan.base_branch.accent(),
                plan.base_sha.muted()
            );
            for candidate in &plan.candidates {
                println!(
                    "  {} {} ({})",
                    "Would merge".success(),
                    candidate.summary(),
                    candidate.head_ref.muted()
                );
            }
        }
    }
    println!();
    println!("{}", "Run without --dry-run to execute.".muted());

    Ok(ExitCode::SUCCESS)
}
