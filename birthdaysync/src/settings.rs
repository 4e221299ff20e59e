// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! Typed access to boolean-like settings.
//!
//! Settings are stored as the strings `"yes"` and `"no"`. Anything other than exactly `"yes"`
//! counts as disabled. An unset value falls back to the [`Toggle`]'s default.

use crate::{base::ConfigStore, Result};

const YES: &str = "yes";
const NO: &str = "no";

/// A boolean setting which exists both instance-wide and per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub app: &'static str,
    pub key: &'static str,
    /// Value used when the setting is unset.
    pub default: bool,
}

/// Whether birthday calendars are generated.
pub const BIRTHDAY_CALENDAR: Toggle = Toggle {
    app: "dav",
    key: "generateBirthdayCalendar",
    default: true,
};

impl Toggle {
    /// Returns the instance-wide value of this toggle.
    ///
    /// # Errors
    ///
    /// If the underlying store fails.
    pub fn enabled(&self, store: &dyn ConfigStore) -> Result<bool> {
        let raw = store.app_value(self.app, self.key)?;
        Ok(decode(raw.as_deref(), self.default))
    }

    /// Returns the value of this toggle for a given user.
    ///
    /// # Errors
    ///
    /// If the underlying store fails.
    pub fn enabled_for(&self, store: &dyn ConfigStore, user: &str) -> Result<bool> {
        let raw = store.user_value(user, self.app, self.key)?;
        Ok(decode(raw.as_deref(), self.default))
    }

    /// Enables this toggle for a given user.
    ///
    /// # Errors
    ///
    /// If the underlying store fails.
    pub fn enable_for(&self, store: &dyn ConfigStore, user: &str) -> Result<()> {
        store.set_user_value(user, self.app, self.key, encode(true))
    }
}

/// Converts a stored value into a boolean.
#[must_use]
pub fn decode(raw: Option<&str>, default: bool) -> bool {
    raw.map_or(default, |value| value == YES)
}

/// Converts a boolean into its stored representation.
#[must_use]
pub const fn encode(value: bool) -> &'static str {
    if value {
        YES
    } else {
        NO
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap};

    use super::{decode, encode, Toggle, BIRTHDAY_CALENDAR};
    use crate::{base::ConfigStore, Result};

    #[derive(Default)]
    struct MemoryStore {
        app: HashMap<(String, String), String>,
        user: RefCell<HashMap<(String, String, String), String>>,
    }

    impl ConfigStore for MemoryStore {
        fn app_value(&self, app: &str, key: &str) -> Result<Option<String>> {
            Ok(self.app.get(&(app.into(), key.into())).cloned())
        }

        fn user_value(&self, user: &str, app: &str, key: &str) -> Result<Option<String>> {
            Ok(self
                .user
                .borrow()
                .get(&(user.into(), app.into(), key.into()))
                .cloned())
        }

        fn set_user_value(&self, user: &str, app: &str, key: &str, value: &str) -> Result<()> {
            self.user
                .borrow_mut()
                .insert((user.into(), app.into(), key.into()), value.into());
            Ok(())
        }
    }

    #[test]
    fn test_decode() {
        assert!(decode(Some("yes"), false));
        assert!(!decode(Some("no"), true));
        // Only the exact value counts.
        assert!(!decode(Some("YES"), true));
        assert!(!decode(Some(""), true));
        assert!(!decode(Some("true"), true));

        assert!(decode(None, true));
        assert!(!decode(None, false));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(true), "yes");
        assert_eq!(encode(false), "no");
    }

    #[test]
    fn test_unset_uses_default() {
        let store = MemoryStore::default();
        assert!(BIRTHDAY_CALENDAR.enabled(&store).unwrap());
        assert!(BIRTHDAY_CALENDAR.enabled_for(&store, "alice").unwrap());

        let off_by_default = Toggle {
            default: false,
            ..BIRTHDAY_CALENDAR
        };
        assert!(!off_by_default.enabled(&store).unwrap());
    }

    #[test]
    fn test_app_value() {
        let mut store = MemoryStore::default();
        store.app.insert(
            ("dav".into(), "generateBirthdayCalendar".into()),
            "no".into(),
        );
        assert!(!BIRTHDAY_CALENDAR.enabled(&store).unwrap());
        // Per-user values are independent.
        assert!(BIRTHDAY_CALENDAR.enabled_for(&store, "alice").unwrap());
    }

    #[test]
    fn test_enable_for_user() {
        let store = MemoryStore::default();
        store
            .set_user_value("alice", "dav", "generateBirthdayCalendar", "no")
            .unwrap();
        assert!(!BIRTHDAY_CALENDAR.enabled_for(&store, "alice").unwrap());

        BIRTHDAY_CALENDAR.enable_for(&store, "alice").unwrap();
        assert!(BIRTHDAY_CALENDAR.enabled_for(&store, "alice").unwrap());
        assert_eq!(
            store
                .user_value("alice", "dav", "generateBirthdayCalendar")
                .unwrap()
                .as_deref(),
            Some("yes")
        );
    }
}
