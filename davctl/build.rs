// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

use std::process::Command;

fn main() {
    if std::env::var("DAVCTL_VERSION").is_err() {
        let version = Command::new("git")
            .args(["describe", "--tags"])
            .output()
            .map(|o| {
                if o.status.success() {
                    String::from_utf8_lossy(&o.stdout).trim().to_owned()
                } else {
                    String::from(env!("CARGO_PKG_VERSION")) // not a git checkout
                }
            })
            .unwrap_or(String::from(env!("CARGO_PKG_VERSION"))); // failed to run git

        println!("cargo:rustc-env=DAVCTL_VERSION={version}");
    }
}
