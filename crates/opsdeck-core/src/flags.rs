// ── Console feature flags ──
//
// Process-wide visibility switches for console sections. Initialized
// from configuration at startup and mutated only through `FlagStore::set`;
// kept apart from resource collections so flag flips never touch
// entity state.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tokio::sync::watch;

/// Visibility switches, one per console section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleFlags {
    pub notifications_tray: bool,
    pub contract_editing: bool,
    pub security_rules: bool,
    pub comparisons: bool,
}

impl Default for ConsoleFlags {
    fn default() -> Self {
        Self {
            notifications_tray: true,
            contract_editing: true,
            security_rules: true,
            comparisons: true,
        }
    }
}

/// Names the individual switches so they can be flipped from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ConsoleFlag {
    NotificationsTray,
    ContractEditing,
    SecurityRules,
    Comparisons,
}

/// Observable flag store. One instance per process.
#[derive(Debug)]
pub struct FlagStore {
    flags: watch::Sender<ConsoleFlags>,
}

impl FlagStore {
    pub fn new(initial: ConsoleFlags) -> Self {
        let (flags, _) = watch::channel(initial);
        Self { flags }
    }

    /// Current flag values.
    pub fn current(&self) -> ConsoleFlags {
        *self.flags.borrow()
    }

    pub fn is_enabled(&self, flag: ConsoleFlag) -> bool {
        let current = self.current();
        match flag {
            ConsoleFlag::NotificationsTray => current.notifications_tray,
            ConsoleFlag::ContractEditing => current.contract_editing,
            ConsoleFlag::SecurityRules => current.security_rules,
            ConsoleFlag::Comparisons => current.comparisons,
        }
    }

    /// Flip one switch. Observers see the change immediately.
    pub fn set(&self, flag: ConsoleFlag, enabled: bool) {
        self.flags.send_modify(|f| match flag {
            ConsoleFlag::NotificationsTray => f.notifications_tray = enabled,
            ConsoleFlag::ContractEditing => f.contract_editing = enabled,
            ConsoleFlag::SecurityRules => f.security_rules = enabled,
            ConsoleFlag::Comparisons => f.comparisons = enabled,
        });
    }

    /// Replace all switches at once (used when a profile is reloaded).
    pub fn replace(&self, flags: ConsoleFlags) {
        self.flags.send_modify(|f| *f = flags);
    }

    /// Subscribe to flag changes.
    pub fn subscribe(&self) -> watch::Receiver<ConsoleFlags> {
        self.flags.subscribe()
    }
}

impl Default for FlagStore {
    fn default() -> Self {
        Self::new(ConsoleFlags::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn defaults_show_everything() {
        let store = FlagStore::default();
        for flag in ConsoleFlag::iter() {
            assert!(store.is_enabled(flag), "{flag} should default on");
        }
    }

    #[test]
    fn set_flips_one_switch_only() {
        let store = FlagStore::default();
        store.set(ConsoleFlag::Comparisons, false);

        assert!(!store.is_enabled(ConsoleFlag::Comparisons));
        assert!(store.is_enabled(ConsoleFlag::NotificationsTray));
        assert!(store.is_enabled(ConsoleFlag::ContractEditing));
        assert!(store.is_enabled(ConsoleFlag::SecurityRules));
    }

    #[test]
    fn subscribers_observe_changes() {
        let store = FlagStore::default();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.set(ConsoleFlag::SecurityRules, false);
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().security_rules);
    }

    #[test]
    fn flag_names_parse_kebab_case() {
        let flag = ConsoleFlag::from_str("notifications-tray").unwrap();
        assert_eq!(flag, ConsoleFlag::NotificationsTray);
        assert_eq!(ConsoleFlag::Comparisons.to_string(), "comparisons");
        assert!(ConsoleFlag::from_str("no-such-flag").is_err());
    }

    #[test]
    fn flags_serialize_kebab_case() {
        let flags = ConsoleFlags {
            comparisons: false,
            ..ConsoleFlags::default()
        };
        let json = serde_json::to_value(&flags).unwrap();
        assert_eq!(json["notifications-tray"], true);
        assert_eq!(json["comparisons"], false);
    }
}
