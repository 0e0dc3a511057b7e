// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use famledger::ledger::LedgerStore;
use famledger::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    // The store context is built once here and handed to whichever command
    // needs it; it is dropped when the process exits.
    let store = LedgerStore::new(db::open_or_init()?);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("login", sub)) => commands::session::login(&store, sub)?,
        Some(("logout", _)) => commands::session::logout(&store)?,
        Some(("whoami", _)) => commands::session::whoami(&store)?,
        Some(("tx", sub)) => commands::transactions::handle(&store, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("mirror", sub)) => commands::mirror::handle(&store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
