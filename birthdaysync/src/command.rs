// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! The `dav:sync-birthday-calendar` command.
//!
//! See [`SyncCommand`] as an entry point to this module.

use std::io::Write;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};

use crate::{
    base::{BirthdaySync, ConfigStore, UserDirectory},
    settings::BIRTHDAY_CALENDAR,
    UserId,
};

/// Name under which this command is exposed on the command line.
pub const NAME: &str = "dav:sync-birthday-calendar";

/// An error running a [`SyncCommand`].
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// Birthday calendars are disabled for the whole instance.
    #[error("birthday calendars are disabled")]
    Disabled,

    /// The named user does not exist.
    #[error("user <{0}> is unknown")]
    UnknownUser(UserId),

    /// Synchronising the birthday calendar of `user` failed.
    #[error("failed to synchronise birthday calendar for {user}")]
    Sync {
        user: UserId,
        #[source]
        source: crate::Error,
    },

    /// Reading users or settings, or writing settings, failed.
    #[error("failed to access users or settings")]
    Storage(#[from] crate::Error),

    /// Writing status lines failed.
    #[error("failed to write status output")]
    Output(#[from] std::io::Error),
}

/// Synchronises birthday calendars for a single user or for all users.
///
/// Nothing happens if birthday calendars are disabled instance-wide. When a user is named
/// explicitly, their own flag is switched back on before synchronising. When running for all
/// users, those who have disabled birthday calendars are skipped.
pub struct SyncCommand<'a> {
    config: &'a dyn ConfigStore,
    users: &'a dyn UserDirectory,
    birthdays: &'a dyn BirthdaySync,
    progress: fn() -> ProgressDrawTarget,
}

impl<'a> SyncCommand<'a> {
    #[must_use]
    pub fn new(
        config: &'a dyn ConfigStore,
        users: &'a dyn UserDirectory,
        birthdays: &'a dyn BirthdaySync,
    ) -> SyncCommand<'a> {
        SyncCommand {
            config,
            users,
            birthdays,
            progress: ProgressDrawTarget::stdout,
        }
    }

    /// Use a different draw target for the progress bar shown when synchronising all users.
    ///
    /// The default draws to standard output.
    #[must_use]
    pub fn with_progress(mut self, target: fn() -> ProgressDrawTarget) -> Self {
        self.progress = target;
        self
    }

    /// Runs the command for `user`, or for all users if `None`.
    ///
    /// Status lines are written to `output`.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Disabled`] if birthday calendars are disabled instance-wide.
    /// - [`SyncError::UnknownUser`] if `user` does not exist.
    /// - [`SyncError::Sync`] if synchronising any user fails. When running for all users, no
    ///   further users are processed after a failure.
    pub fn execute<W: Write>(&self, user: Option<&str>, output: &mut W) -> Result<(), SyncError> {
        self.verify_enabled()?;

        match user {
            Some(user) => self.sync_single(user, output),
            None => self.sync_all(output),
        }
    }

    fn verify_enabled(&self) -> Result<(), SyncError> {
        if BIRTHDAY_CALENDAR.enabled(self.config)? {
            Ok(())
        } else {
            Err(SyncError::Disabled)
        }
    }

    fn sync_single<W: Write>(&self, user: &str, output: &mut W) -> Result<(), SyncError> {
        if !self.users.user_exists(user)? {
            return Err(SyncError::UnknownUser(user.to_owned()));
        }

        // Naming a user explicitly turns their birthday calendar back on.
        if !BIRTHDAY_CALENDAR.enabled_for(self.config, user)? {
            BIRTHDAY_CALENDAR.enable_for(self.config, user)?;
            info!("Re-enabled birthday calendar for {user}");
            writeln!(output, "Re-enabling birthday calendar for {user}")?;
        }

        writeln!(output, "Start birthday calendar sync for {user}")?;
        self.sync_user(user)
    }

    fn sync_all<W: Write>(&self, output: &mut W) -> Result<(), SyncError> {
        writeln!(output, "Start birthday calendar sync for all users ...")?;

        let users = self.users.users()?;
        let progress = progress_bar(users.size_hint(), (self.progress)());
        progress.tick();

        let mut synced = 0_usize;
        let result = users.into_iter().try_for_each(|user| {
            progress.inc(1);
            let user = user?;

            // Unlike `sync_single`, users who opted out stay opted out.
            if !BIRTHDAY_CALENDAR.enabled_for(self.config, &user)? {
                debug!("Skipping {user}: birthday calendar is disabled");
                return Ok(());
            }

            synced += 1;
            self.sync_user(&user)
        });

        match result {
            Ok(()) => progress.finish(),
            Err(_) => progress.abandon(),
        }
        result?;

        debug!("Synchronised birthday calendars for {synced} users");
        writeln!(output)?;
        Ok(())
    }

    fn sync_user(&self, user: &str) -> Result<(), SyncError> {
        info!("Synchronising birthday calendar for {user}");
        self.birthdays
            .sync_user(user)
            .map_err(|source| SyncError::Sync {
                user: user.to_owned(),
                source,
            })
    }
}

fn progress_bar(size_hint: (usize, Option<usize>), target: ProgressDrawTarget) -> ProgressBar {
    match size_hint {
        (lower, Some(upper)) if lower == upper => {
            let bar = ProgressBar::with_draw_target(u64::try_from(lower).ok(), target);
            bar.set_style(ProgressStyle::default_bar());
            bar
        }
        _ => {
            let bar = ProgressBar::with_draw_target(None, target);
            bar.set_style(
                ProgressStyle::with_template("{spinner} {pos} users")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    }
}
