//! Notification command handlers.

use std::sync::Arc;

use tabled::Tabled;

use opsdeck_core::view::NotificationFilter;
use opsdeck_core::{Console, EntityId, MarkRead, Notification, view};

use crate::cli::{GlobalOpts, NotificationsArgs, NotificationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Read")]
    read: String,
}

impl NotificationRow {
    fn new(n: &Arc<Notification>, color: bool) -> Self {
        Self {
            id: n.id.to_string(),
            severity: output::status_cell(&n.severity.to_string(), color),
            title: n.title.clone(),
            created: n
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            read: if n.read { "✓".into() } else { String::new() },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: NotificationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NotificationsCommand::List(list) => {
            let snapshot = console.store().notifications_snapshot();
            let filter = if list.unread {
                NotificationFilter::Unread
            } else {
                NotificationFilter::All
            };
            let filtered: Vec<Arc<Notification>> = snapshot
                .iter()
                .filter(|n| filter.matches(n.as_ref()))
                .cloned()
                .collect();
            let page = view::paginate(&filtered, list.per_page, list.page);

            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                page,
                |n| NotificationRow::new(n, color),
                |n| n.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NotificationsCommand::Read { id } => {
            let syncs = console.syncs()?;
            let id = EntityId::from(id.as_str());
            let updated = syncs.notifications.toggle(&id, &MarkRead).await?;
            if !global.quiet {
                eprintln!("✓ Marked '{}' as read", updated.title);
            }
            Ok(())
        }

        NotificationsCommand::ReadAll => {
            let syncs = console.syncs()?;
            let snapshot = console.store().notifications_snapshot();
            let unread: Vec<EntityId> = snapshot
                .iter()
                .filter(|n| !n.read)
                .map(|n| n.id.clone())
                .collect();

            let count = unread.len();
            for id in unread {
                syncs.notifications.toggle(&id, &MarkRead).await?;
            }
            if !global.quiet {
                eprintln!("✓ Marked {count} notification(s) as read");
            }
            Ok(())
        }

        NotificationsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete notification {id}?"), global.yes)? {
                return Ok(());
            }
            let syncs = console.syncs()?;
            syncs
                .notifications
                .remove(&EntityId::from(id.as_str()))
                .await?;
            if !global.quiet {
                eprintln!("✓ Notification deleted");
            }
            Ok(())
        }
    }
}
