// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

use std::{
    ffi::OsString,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use birthdaysync::{command::SyncCommand, external::ExternalSync, instance::InstanceFile};
use clap::Args;

#[derive(Args)]
pub(crate) struct SyncBirthdayCalendarArgs {
    /// User for whom the birthday calendar will be synchronized
    pub(crate) user: Option<String>,

    /// Program run once per user, with the user id as its last argument.
    ///
    /// Defaults to the value of `DAVCTL_SYNC_COMMAND`.
    #[arg(long)]
    sync_command: Option<PathBuf>,

    /// Extra argument for the sync command, passed before the user id. May be repeated.
    #[arg(long = "sync-arg", allow_hyphen_values = true)]
    pub(crate) sync_args: Vec<String>,
}

impl SyncBirthdayCalendarArgs {
    pub(crate) fn execute(self, instance: &Path) -> anyhow::Result<()> {
        let fallback = std::env::var_os("DAVCTL_SYNC_COMMAND");
        self.run(instance, fallback, &mut std::io::stdout().lock())
    }

    fn run<W: Write>(
        self,
        instance: &Path,
        fallback: Option<OsString>,
        output: &mut W,
    ) -> anyhow::Result<()> {
        let program = self
            .sync_command
            .or_else(|| fallback.map(PathBuf::from))
            .context("no sync command given; use --sync-command or set DAVCTL_SYNC_COMMAND")?;
        let sync = ExternalSync::new(program).args(self.sync_args);

        let instance = InstanceFile::open(instance)
            .with_context(|| format!("failed to open instance file {}", instance.display()))?;

        SyncCommand::new(&instance, &instance, &sync).execute(self.user.as_deref(), output)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{ffi::OsString, fs, path::Path};

    use clap::Parser;
    use tempfile::tempdir;

    use super::SyncBirthdayCalendarArgs;
    use crate::cli::{Cli, Command};

    const INSTANCE: &str = r#"
[users.alice.dav]
generateBirthdayCalendar = "no"
"#;

    fn parse(args: &[&str]) -> SyncBirthdayCalendarArgs {
        let cli = Cli::try_parse_from(
            ["davctl", "dav:sync-birthday-calendar"]
                .iter()
                .chain(args.iter()),
        )
        .unwrap();
        let Command::SyncBirthdayCalendar(args) = cli.command;
        args
    }

    fn run(
        args: &[&str],
        instance: &Path,
        fallback: Option<&str>,
    ) -> (anyhow::Result<()>, String) {
        let mut output = Vec::new();
        let result = parse(args).run(instance, fallback.map(OsString::from), &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_sync_single_user() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instance.toml");
        fs::write(&path, INSTANCE).unwrap();

        let (result, output) = run(&["--sync-command", "true", "alice"], &path, None);

        result.unwrap();
        assert_eq!(
            output,
            "Re-enabling birthday calendar for alice\nStart birthday calendar sync for alice\n"
        );
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains(r#"generateBirthdayCalendar = "yes""#));
    }

    #[test]
    fn test_sync_command_from_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instance.toml");
        fs::write(&path, INSTANCE).unwrap();

        // An explicit flag wins over the fallback.
        let (result, _) = run(&["--sync-command", "true", "alice"], &path, Some("false"));
        result.unwrap();

        let (result, _) = run(&["alice"], &path, Some("false"));
        let err = result.unwrap_err();
        assert!(
            format!("{err:#}").contains("failed to synchronise birthday calendar for alice"),
            "{err:#}"
        );
    }

    #[test]
    fn test_missing_sync_command() {
        let dir = tempdir().unwrap();
        // Reported before the (missing) instance file is opened.
        let (result, output) = run(&["alice"], &dir.path().join("missing.toml"), None);

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("no sync command given"), "{err}");
        assert!(output.is_empty());
    }

    #[test]
    fn test_missing_instance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let (result, _) = run(&["--sync-command", "true"], &path, None);

        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("failed to open instance file {}", path.display())
        );
    }
}
