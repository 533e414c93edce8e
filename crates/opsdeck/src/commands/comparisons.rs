//! Comparison run command handlers.

use std::sync::Arc;

use tabled::Tabled;

use opsdeck_core::view;
use opsdeck_core::{Comparison, ComparisonDraft, ComparisonStatus, Console, EntityId};

use crate::cli::{ComparisonStatusArg, ComparisonsArgs, ComparisonsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn core_status(arg: ComparisonStatusArg) -> ComparisonStatus {
    match arg {
        ComparisonStatusArg::Pending => ComparisonStatus::Pending,
        ComparisonStatusArg::Running => ComparisonStatus::Running,
        ComparisonStatusArg::Succeeded => ComparisonStatus::Succeeded,
        ComparisonStatusArg::Failed => ComparisonStatus::Failed,
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Mismatches")]
    mismatches: u32,
    #[tabled(rename = "Ran")]
    ran: String,
}

impl ComparisonRow {
    fn new(c: &Arc<Comparison>, color: bool) -> Self {
        Self {
            id: c.id.to_string(),
            source: c.source_system.clone(),
            target: c.target_system.clone(),
            status: output::status_cell(&c.status.to_string(), color),
            mismatches: c.mismatches,
            ran: c
                .ran_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

fn detail(c: &Arc<Comparison>) -> String {
    let mut lines = vec![
        format!("ID:         {}", c.id),
        format!("Source:     {}", c.source_system),
        format!("Target:     {}", c.target_system),
        format!("Status:     {}", c.status),
        format!("Mismatches: {}", c.mismatches),
    ];
    if let Some(t) = c.ran_at {
        lines.push(format!("Ran:        {}", t.format("%Y-%m-%d %H:%M:%S")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: ComparisonsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ComparisonsCommand::List(list) => {
            let snapshot = console.store().comparisons_snapshot();
            let filtered: Vec<Arc<Comparison>> = match list.status {
                Some(status) => view::comparisons_with_status(&snapshot, core_status(status)),
                None => snapshot.to_vec(),
            };

            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &filtered,
                |c| ComparisonRow::new(c, color),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ComparisonsCommand::Show { id } => {
            // Always re-fetch: an in-progress run's status and mismatch
            // count move on the server, not in the local snapshot.
            let run = console
                .comparison_detail(&EntityId::from(id.as_str()))
                .await?;
            let out = output::render_single(&global.output, &run, detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ComparisonsCommand::Run { source, target } => {
            let draft = ComparisonDraft {
                source_system: source,
                target_system: target,
            };
            let payload = draft.to_payload()?;

            let syncs = console.syncs()?;
            let created = syncs.comparisons.create(&payload).await?;
            if !global.quiet {
                eprintln!(
                    "✓ Comparison {} started ({} → {})",
                    created.id, created.source_system, created.target_system
                );
                eprintln!("  Watch it with: opsdeck comparisons show {}", created.id);
            }
            Ok(())
        }

        ComparisonsCommand::Delete { id } => {
            let eid = EntityId::from(id.as_str());
            if !util::confirm(&format!("Delete comparison {id}?"), global.yes)? {
                return Ok(());
            }

            let syncs = console.syncs()?;
            syncs.comparisons.remove(&eid).await?;
            if !global.quiet {
                eprintln!("✓ Comparison deleted");
            }
            Ok(())
        }
    }
}
