//! Security rule command handlers.

use std::sync::Arc;

use dialoguer::Input;
use tabled::Tabled;

use opsdeck_core::{Console, EntityId, RuleEnabled, SecurityRule, SecurityRuleDraft};

use crate::cli::{GlobalOpts, RulesArgs, RulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Builtin")]
    builtin: String,
}

impl RuleRow {
    fn new(r: &Arc<SecurityRule>, color: bool) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            enabled: output::bool_cell(r.enabled, "yes", "no", color),
            builtin: if r.builtin { "✓".into() } else { String::new() },
        }
    }
}

/// Built-in rules ship with the console; only their enabled flag is
/// editable. Refusing here gives a better message than the server's 403.
fn builtin_guard(rule: &SecurityRule, action: &str) -> Result<(), CliError> {
    if rule.builtin {
        return Err(CliError::Validation {
            field: "id".into(),
            reason: format!("built-in rule '{}' cannot be {action}", rule.name),
        });
    }
    Ok(())
}

fn rule_by_id(console: &Console, id: &str) -> Result<Arc<SecurityRule>, CliError> {
    console
        .store()
        .security_rule_by_id(&EntityId::from(id))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "security rule".into(),
            identifier: id.to_owned(),
            list_command: "rules list".into(),
        })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: RulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RulesCommand::List => {
            let snapshot = console.store().security_rules_snapshot();
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &snapshot,
                |r| RuleRow::new(r, color),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RulesCommand::Create {
            name,
            description,
            disabled,
        } => {
            let mut draft = SecurityRuleDraft::empty();
            draft.enabled = !disabled;
            if let Some(name) = name {
                draft.name = name;
            } else {
                draft.name = Input::new()
                    .with_prompt("Name")
                    .interact_text()
                    .map_err(util::prompt_err)?;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            let payload = draft.to_payload()?;

            let syncs = console.syncs()?;
            let created = syncs.security_rules.create(&payload).await?;
            if !global.quiet {
                eprintln!("✓ Rule '{}' created with id {}", created.name, created.id);
            }
            Ok(())
        }

        RulesCommand::Edit {
            id,
            name,
            description,
        } => {
            let eid = EntityId::from(id.as_str());
            let current = rule_by_id(console, &id)?;
            builtin_guard(&current, "modified")?;

            let mut draft = SecurityRuleDraft::from_entity(&current);
            let prompt_all = name.is_none() && description.is_none();
            if let Some(name) = name {
                draft.name = name;
            } else if prompt_all {
                draft.name = Input::new()
                    .with_prompt("Name")
                    .default(draft.name.clone())
                    .interact_text()
                    .map_err(util::prompt_err)?;
            }
            if let Some(description) = description {
                draft.description = description;
            } else if prompt_all {
                draft.description = Input::new()
                    .with_prompt("Description")
                    .default(draft.description.clone())
                    .allow_empty(true)
                    .interact_text()
                    .map_err(util::prompt_err)?;
            }
            let payload = draft.to_payload()?;

            let syncs = console.syncs()?;
            let updated = syncs.security_rules.update(&eid, &payload).await?;
            if !global.quiet {
                eprintln!("✓ Rule '{}' updated", updated.name);
            }
            Ok(())
        }

        RulesCommand::Enable { id } => set_enabled(console, &id, true, global).await,

        RulesCommand::Disable { id } => set_enabled(console, &id, false, global).await,

        RulesCommand::Delete { id } => {
            let eid = EntityId::from(id.as_str());
            let rule = rule_by_id(console, &id)?;
            builtin_guard(&rule, "deleted")?;

            if !util::confirm(&format!("Delete rule '{}'?", rule.name), global.yes)? {
                return Ok(());
            }

            let syncs = console.syncs()?;
            syncs.security_rules.remove(&eid).await?;
            if !global.quiet {
                eprintln!("✓ Rule deleted");
            }
            Ok(())
        }
    }
}

async fn set_enabled(
    console: &Console,
    id: &str,
    enabled: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let syncs = console.syncs()?;
    let updated = syncs
        .security_rules
        .toggle(&EntityId::from(id), &RuleEnabled(enabled))
        .await?;
    if !global.quiet {
        let state = if enabled { "enabled" } else { "disabled" };
        eprintln!("✓ Rule '{}' {state}", updated.name);
    }
    Ok(())
}
