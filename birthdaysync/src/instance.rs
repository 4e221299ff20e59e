// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! Settings and users of an instance, kept in a single TOML file.
//!
//! The file has the following shape:
//!
//! ```toml
//! [apps.dav]
//! generateBirthdayCalendar = "yes"
//!
//! [users.alice.dav]
//! generateBirthdayCalendar = "no"
//!
//! [users.bob]
//! ```
//!
//! Every key under `users` is an existing user, even if it has no settings. Other tables, comments
//! and formatting are left untouched when settings are written.
#![allow(clippy::module_name_repetitions)]

use std::{
    cell::RefCell,
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;
use tempfile::NamedTempFile;
use toml_edit::{Document, Item, Table, TableLike};

use crate::{
    base::{ConfigStore, UserDirectory},
    Error, ErrorKind, Result, UserId,
};

/// Settings of a single app, by key.
type AppSettings = BTreeMap<String, String>;

/// The parts of the file this module understands. Only used for reading.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
struct InstanceData {
    #[serde(default)]
    apps: BTreeMap<String, AppSettings>,
    #[serde(default)]
    users: BTreeMap<UserId, BTreeMap<String, AppSettings>>,
}

#[derive(Debug, Clone)]
struct State {
    document: Document,
    data: InstanceData,
}

impl State {
    fn parse(raw: &str) -> Result<State> {
        let document = raw
            .parse::<Document>()
            .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
        let data = toml::from_str(raw).map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
        Ok(State { document, data })
    }
}

/// An instance backed by a TOML file.
///
/// The file is read once when opening. Every write is persisted immediately by replacing the
/// whole file.
#[derive(Debug)]
pub struct InstanceFile {
    path: PathBuf,
    state: RefCell<State>,
}

impl InstanceFile {
    /// Opens an existing instance file.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::DoesNotExist`] if the file does not exist.
    /// - [`ErrorKind::InvalidData`] if the file is not valid.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<InstanceFile> {
        let path = path.into();
        let state = State::parse(&std::fs::read_to_string(&path)?)?;
        debug!("Loaded instance from {}", path.display());

        Ok(InstanceFile {
            path,
            state: RefCell::new(state),
        })
    }

    /// Atomically replaces the file with `raw`.
    fn persist(&self, raw: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        // Dropping the temporary file on any error path removes it.
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(raw.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| Error::from(e.error))?;

        Ok(())
    }
}

/// Sets `users.<user>.<app>.<key>` in a document, creating tables as needed.
fn set_user_key(
    document: &mut Document,
    user: &str,
    app: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let mut table: &mut dyn TableLike = document.as_table_mut();
    for name in ["users", user, app] {
        if !table.contains_key(name) {
            let mut child = Table::new();
            child.set_implicit(true);
            table.insert(name, Item::Table(child));
        }
        table = table
            .get_mut(name)
            .and_then(Item::as_table_like_mut)
            .ok_or_else(|| {
                Error::new(ErrorKind::InvalidData, format!("`{name}` is not a table"))
            })?;
    }
    table.insert(key, toml_edit::value(value));

    Ok(())
}

impl ConfigStore for InstanceFile {
    fn app_value(&self, app: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .state
            .borrow()
            .data
            .apps
            .get(app)
            .and_then(|settings| settings.get(key))
            .cloned())
    }

    fn user_value(&self, user: &str, app: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .state
            .borrow()
            .data
            .users
            .get(user)
            .and_then(|apps| apps.get(app))
            .and_then(|settings| settings.get(key))
            .cloned())
    }

    fn set_user_value(&self, user: &str, app: &str, key: &str, value: &str) -> Result<()> {
        if !self.user_exists(user)? {
            return Err(Error::new(
                ErrorKind::DoesNotExist,
                format!("no such user: {user}"),
            ));
        }

        // Work on a copy, so a failed write leaves the current state intact.
        let mut document = self.state.borrow().document.clone();
        set_user_key(&mut document, user, app, key, value)?;
        let raw = document.to_string();
        let updated = State::parse(&raw)?;

        self.persist(&raw)?;
        *self.state.borrow_mut() = updated;
        Ok(())
    }
}

impl UserDirectory for InstanceFile {
    fn user_exists(&self, user: &str) -> Result<bool> {
        Ok(self.state.borrow().data.users.contains_key(user))
    }

    fn users(&self) -> Result<Box<dyn Iterator<Item = Result<UserId>> + '_>> {
        // Snapshot the ids, so that settings can be written while iterating.
        let ids = self
            .state
            .borrow()
            .data
            .users
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        Ok(Box::new(ids.into_iter().map(Ok)))
    }
}
