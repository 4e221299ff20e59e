// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! This crate triggers the synchronisation of birthday calendars for the users of a groupware
//! instance. Computing the calendars themselves is left to a [`BirthdaySync`] implementation;
//! this crate only decides *who* gets synchronised.
//!
//! # Key concepts
//!
//! [`SyncCommand`] is the main entry point. It is wired to three collaborators:
//!
//! - A [`ConfigStore`], holding instance-wide and per-user settings.
//! - A [`UserDirectory`], which knows which users exist.
//! - A [`BirthdaySync`], which does the actual work for a single user.
//!
//! [`InstanceFile`](crate::instance::InstanceFile) implements the first two on top of a single
//! TOML file, and [`ExternalSync`](crate::external::ExternalSync) implements the last one by
//! running an external program.
//!
//! ## Enablement flags
//!
//! Birthday calendars may be disabled for the whole instance, or for individual users. Flags are
//! stored as strings, and only the exact value `"yes"` enables the feature. See
//! [`Toggle`](crate::settings::Toggle) for the typed view of these values.
//!
//! [`SyncCommand`]: crate::command::SyncCommand
//! [`ConfigStore`]: crate::base::ConfigStore
//! [`UserDirectory`]: crate::base::UserDirectory
//! [`BirthdaySync`]: crate::base::BirthdaySync

pub mod base;
pub mod command;
pub mod external;
pub mod instance;
pub mod settings;

type Result<T> = std::result::Result<T, crate::Error>;

/// What went wrong in a collaborator, independently of which backend failed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// A file, user or program was not found.
    DoesNotExist,
    AccessDenied,
    /// Any other I/O failure.
    Io,
    /// Stored data could not be parsed or has an unexpected shape.
    InvalidData,
    InvalidInput,
    /// An external process ran, but reported failure.
    Failed,
}

impl ErrorKind {
    #[must_use]
    const fn description(self) -> &'static str {
        match self {
            ErrorKind::DoesNotExist => "not found",
            ErrorKind::AccessDenied => "permission denied",
            ErrorKind::Io => "i/o error",
            ErrorKind::InvalidData => "invalid data",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::Failed => "external process failed",
        }
    }
}

/// Error returned by collaborator implementations.
///
/// Carries an [`ErrorKind`] and the underlying cause.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl Error {
    /// Creates a new error of the given kind, wrapping an underlying cause.
    pub fn new<E>(kind: ErrorKind, source: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error {
            kind,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        let kind = match value.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::DoesNotExist,
            std::io::ErrorKind::PermissionDenied => ErrorKind::AccessDenied,
            std::io::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => ErrorKind::InvalidData,
            _ => ErrorKind::Io,
        };
        Error::new(kind, value)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = &*self.source;
        Some(source)
    }
}

/// Identifier of a user account.
///
/// This is whatever the user directory uses to address accounts, and should be treated as an
/// opaque string by consumers of this library.
pub type UserId = String;
