// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::LedgerStore;
use crate::mirror::{self, MirrorConfig};
use anyhow::Result;
use std::path::Path;

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("use-http", sub)) => {
            let url = sub.get_one::<String>("url").unwrap();
            mirror::use_http(store.conn(), url)?;
            println!("Mirroring to sheet endpoints under {}", url);
        }
        Some(("use-sheet", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            mirror::use_sheet(store.conn(), Path::new(path))?;
            println!("Mirroring to local sheet {}", path);
        }
        Some(("show", _)) => match mirror::configured(store.conn())? {
            MirrorConfig::Http(url) => println!("http mirror: {}", url),
            MirrorConfig::Sheet(path) => println!("sheet mirror: {}", path.display()),
        },
        _ => {}
    }
    Ok(())
}
