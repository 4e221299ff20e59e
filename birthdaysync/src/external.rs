// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! A [`BirthdaySync`] which delegates to an external program.

use std::{ffi::OsString, path::PathBuf, process::Command};

use log::{debug, trace};

use crate::{base::BirthdaySync, Error, ErrorKind, Result};

/// Runs a program once per user, with the user's id as its last argument.
///
/// ```
/// # use birthdaysync::external::ExternalSync;
/// let sync = ExternalSync::new("/usr/local/bin/sync-birthdays").arg("--quiet");
/// ```
#[derive(Debug, Clone)]
pub struct ExternalSync {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalSync {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(program: P) -> ExternalSync {
        ExternalSync {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds a fixed argument, passed before the user id.
    #[must_use]
    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        args.into_iter().fold(self, ExternalSync::arg)
    }
}

impl BirthdaySync for ExternalSync {
    fn sync_user(&self, user: &str) -> Result<()> {
        debug!("Running {} for {user}", self.program.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(user)
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            trace!("{}: {}", self.program.display(), stdout.trim());
        }

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => output.status.to_string(),
                stderr => format!("{}: {stderr}", output.status),
            };
            Err(Error::new(ErrorKind::Failed, message))
        }
    }
}
