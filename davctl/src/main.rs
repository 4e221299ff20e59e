// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::Context;
use clap::Parser;

mod birthday;
mod cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    simple_logger::init_with_level(cli.log_level()).context("failed to initialise logger")?;
    let instance = cli.instance()?;

    match cli.command {
        cli::Command::SyncBirthdayCalendar(args) => args.execute(&instance),
    }
}
