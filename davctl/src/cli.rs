// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

use std::{ffi::OsString, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use crate::birthday::SyncBirthdayCalendarArgs;

#[derive(Clone, ValueEnum)]
enum Verbosity {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Synchronizes the birthday calendar
    #[command(name = birthdaysync::command::NAME)]
    SyncBirthdayCalendar(SyncBirthdayCalendarArgs),
}

#[derive(Parser)]
#[clap(author, version = env!("DAVCTL_VERSION"), about, long_about = None)]
pub(crate) struct Cli {
    /// Path to the instance file with users and their settings.
    ///
    /// Defaults to the value of `DAVCTL_INSTANCE`.
    #[arg(long)]
    instance: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,

    /// Change logging verbosity
    #[clap(short, long)]
    verbose: Option<Verbosity>,
}

impl Cli {
    /// Returns the desired log level.
    /// The default log level is WARN.
    pub(crate) fn log_level(&self) -> log::Level {
        match self.verbose {
            Some(Verbosity::Error) => log::Level::Error,
            Some(Verbosity::Warn) | None => log::Level::Warn,
            Some(Verbosity::Info) => log::Level::Info,
            Some(Verbosity::Debug) => log::Level::Debug,
            Some(Verbosity::Trace) => log::Level::Trace,
        }
    }

    /// Returns the path to the instance file.
    pub(crate) fn instance(&self) -> anyhow::Result<PathBuf> {
        self.instance_or(std::env::var_os("DAVCTL_INSTANCE"))
    }

    fn instance_or(&self, fallback: Option<OsString>) -> anyhow::Result<PathBuf> {
        self.instance
            .clone()
            .or_else(|| fallback.map(PathBuf::from))
            .context("no instance file given; use --instance or set DAVCTL_INSTANCE")
    }
}
