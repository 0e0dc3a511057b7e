// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth;
use crate::ledger::LedgerStore;
use anyhow::Result;

pub fn login(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    let user = m.get_one::<String>("user").unwrap();
    let password = m.get_one::<String>("password").unwrap();
    // A bad credential pair is recoverable: report inline, no lockout.
    match auth::login(store.conn(), user, password) {
        Ok(profile) => println!("Logged in as {} ({})", profile.name, profile.subtitle),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

pub fn logout(store: &LedgerStore) -> Result<()> {
    auth::logout(store.conn())?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(store: &LedgerStore) -> Result<()> {
    match auth::active_profile(store.conn())? {
        Some(name) => println!("{}", name),
        None => println!("Not logged in"),
    }
    Ok(())
}
