// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! Traits for the collaborators used by [`SyncCommand`].
//!
//! When writing code that should work with different backends, these traits should be used as
//! inputs rather than concrete types. All of them take `&self`: a single backend (e.g.:
//! [`InstanceFile`]) may implement several traits and be shared by the command.
//!
//! [`SyncCommand`]: crate::command::SyncCommand
//! [`InstanceFile`]: crate::instance::InstanceFile

use crate::{Result, UserId};

/// Key/value settings, either instance-wide (per app) or per user.
///
/// Values are raw strings. Use [`Toggle`](crate::settings::Toggle) for a typed view of
/// boolean-like settings.
pub trait ConfigStore {
    /// Returns the instance-wide value for `key` in `app`, if any is set.
    fn app_value(&self, app: &str, key: &str) -> Result<Option<String>>;

    /// Returns the value for `key` in `app` for a given user, if any is set.
    fn user_value(&self, user: &str, app: &str, key: &str) -> Result<Option<String>>;

    /// Sets the value for `key` in `app` for a given user.
    ///
    /// Each call is expected to be individually atomic.
    fn set_user_value(&self, user: &str, app: &str, key: &str, value: &str) -> Result<()>;
}

/// Source of user accounts.
pub trait UserDirectory {
    /// Returns `true` if a user with this identifier exists.
    fn user_exists(&self, user: &str) -> Result<bool>;

    /// Lazily enumerates all existing users.
    ///
    /// The order is implementation-defined. Calling this again restarts the enumeration.
    fn users(&self) -> Result<Box<dyn Iterator<Item = Result<UserId>> + '_>>;
}

/// Synchronises the birthday calendar of a single user.
///
/// How the calendar is computed and stored is entirely up to implementations. Implementations
/// should be idempotent.
pub trait BirthdaySync {
    fn sync_user(&self, user: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::{BirthdaySync, ConfigStore, UserDirectory};

    #[test]
    fn test_traits_are_object_safe() {
        #[allow(dead_code)]
        fn dummy(_: &dyn ConfigStore, _: &dyn UserDirectory, _: &dyn BirthdaySync) {}
    }
}
