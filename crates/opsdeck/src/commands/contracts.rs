//! Contract command handlers.

use std::sync::Arc;

use dialoguer::{Input, Select};
use tabled::Tabled;

use opsdeck_core::view::ContractFilter;
use opsdeck_core::{Console, Contract, ContractDraft, ContractStatus, EntityId};

use crate::cli::{ContractFieldArgs, ContractStatusArg, ContractsArgs, ContractsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn core_status(arg: ContractStatusArg) -> ContractStatus {
    match arg {
        ContractStatusArg::Draft => ContractStatus::Draft,
        ContractStatusArg::Active => ContractStatus::Active,
        ContractStatusArg::Suspended => ContractStatus::Suspended,
        ContractStatusArg::Expired => ContractStatus::Expired,
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ContractRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Partner")]
    partner: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl ContractRow {
    fn new(c: &Arc<Contract>, color: bool) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            partner: c.partner.clone(),
            version: c.version.clone(),
            status: output::status_cell(&c.status.to_string(), color),
            updated: c
                .updated_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

fn detail(c: &Arc<Contract>) -> String {
    let mut lines = vec![
        format!("ID:          {}", c.id),
        format!("Name:        {}", c.name),
        format!("Partner:     {}", c.partner),
        format!("Version:     {}", c.version),
        format!("Status:      {}", c.status),
        format!("Deletable:   {}", c.can_delete),
    ];
    if let Some(ref d) = c.description {
        lines.push(format!("Description: {d}"));
    }
    if let Some(t) = c.updated_at {
        lines.push(format!("Updated:     {}", t.format("%Y-%m-%d %H:%M:%S")));
    }
    lines.join("\n")
}

// ── Interactive prompts ─────────────────────────────────────────────

const STATUSES: [ContractStatus; 4] = [
    ContractStatus::Draft,
    ContractStatus::Active,
    ContractStatus::Suspended,
    ContractStatus::Expired,
];

/// Fill a draft from flags, prompting for whatever is still missing.
///
/// `prompt_all` re-prompts every field with the draft value as default
/// (edit with no flags); otherwise only absent required fields ask.
fn fill_draft(
    draft: &mut ContractDraft,
    fields: ContractFieldArgs,
    prompt_all: bool,
) -> Result<(), CliError> {
    if let Some(name) = fields.name {
        draft.name = name;
    } else if prompt_all || draft.name.trim().is_empty() {
        draft.name = Input::new()
            .with_prompt("Name")
            .default(draft.name.clone())
            .show_default(!draft.name.is_empty())
            .interact_text()
            .map_err(util::prompt_err)?;
    }

    if let Some(partner) = fields.partner {
        draft.partner = partner;
    } else if prompt_all || draft.partner.trim().is_empty() {
        draft.partner = Input::new()
            .with_prompt("Partner")
            .default(draft.partner.clone())
            .show_default(!draft.partner.is_empty())
            .interact_text()
            .map_err(util::prompt_err)?;
    }

    if let Some(description) = fields.description {
        draft.description = description;
    } else if prompt_all {
        draft.description = Input::new()
            .with_prompt("Description")
            .default(draft.description.clone())
            .allow_empty(true)
            .interact_text()
            .map_err(util::prompt_err)?;
    }

    if let Some(version) = fields.version {
        draft.version = version;
    } else if prompt_all {
        draft.version = Input::new()
            .with_prompt("Version")
            .default(draft.version.clone())
            .interact_text()
            .map_err(util::prompt_err)?;
    }

    if let Some(status) = fields.status {
        draft.status = core_status(status);
    } else if prompt_all {
        let labels: Vec<String> = STATUSES.iter().map(ToString::to_string).collect();
        let current = STATUSES
            .iter()
            .position(|s| *s == draft.status)
            .unwrap_or(0);
        let chosen = Select::new()
            .with_prompt("Status")
            .items(&labels)
            .default(current)
            .interact()
            .map_err(util::prompt_err)?;
        draft.status = STATUSES[chosen];
    }

    Ok(())
}

fn no_field_flags(fields: &ContractFieldArgs) -> bool {
    fields.name.is_none()
        && fields.partner.is_none()
        && fields.description.is_none()
        && fields.version.is_none()
        && fields.status.is_none()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: ContractsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ContractsCommand::List(list) => {
            let snapshot = console.store().contracts_snapshot();

            let mut filters: Vec<ContractFilter> = Vec::new();
            if let Some(status) = list.status {
                filters.push(ContractFilter::ByStatus(core_status(status)));
            }
            if let Some(partner) = list.partner {
                filters.push(ContractFilter::ByPartner(partner));
            }
            let filtered: Vec<Arc<Contract>> = snapshot
                .iter()
                .filter(|c| filters.iter().all(|f| f.matches(c.as_ref())))
                .cloned()
                .collect();

            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &filtered,
                |c| ContractRow::new(c, color),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ContractsCommand::Show { id } => {
            let contract = console
                .store()
                .contract_by_id(&EntityId::from(id.as_str()))
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "contract".into(),
                    identifier: id,
                    list_command: "contracts list".into(),
                })?;
            let out = output::render_single(&global.output, &contract, detail, |c| {
                c.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ContractsCommand::Create(fields) => {
            let mut draft = ContractDraft::empty();
            fill_draft(&mut draft, fields, false)?;
            let payload = draft.to_payload()?;

            let syncs = console.syncs()?;
            let created = syncs.contracts.create(&payload).await?;
            if !global.quiet {
                eprintln!("✓ Contract '{}' created with id {}", created.name, created.id);
            }
            Ok(())
        }

        ContractsCommand::Edit { id, fields } => {
            let eid = EntityId::from(id.as_str());
            let current = console.store().contract_by_id(&eid).ok_or_else(|| {
                CliError::NotFound {
                    resource_type: "contract".into(),
                    identifier: id,
                    list_command: "contracts list".into(),
                }
            })?;

            let mut draft = ContractDraft::from_entity(&current);
            let prompt_all = no_field_flags(&fields);
            fill_draft(&mut draft, fields, prompt_all)?;
            let payload = draft.to_payload()?;

            let syncs = console.syncs()?;
            let updated = syncs.contracts.update(&eid, &payload).await?;
            if !global.quiet {
                eprintln!("✓ Contract '{}' updated", updated.name);
            }
            Ok(())
        }

        ContractsCommand::Delete { id } => {
            let eid = EntityId::from(id.as_str());
            let contract = console.store().contract_by_id(&eid).ok_or_else(|| {
                CliError::NotFound {
                    resource_type: "contract".into(),
                    identifier: id.clone(),
                    list_command: "contracts list".into(),
                }
            })?;

            // The console marks contracts with active downstream consumers
            // as non-deletable.
            if !contract.can_delete {
                return Err(CliError::Validation {
                    field: "id".into(),
                    reason: format!("contract '{}' is protected and cannot be deleted", contract.name),
                });
            }

            if !util::confirm(
                &format!("Delete contract '{}'? This cannot be undone.", contract.name),
                global.yes,
            )? {
                return Ok(());
            }

            let syncs = console.syncs()?;
            syncs.contracts.remove(&eid).await?;
            if !global.quiet {
                eprintln!("✓ Contract deleted");
            }
            Ok(())
        }
    }
}
