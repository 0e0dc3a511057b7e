// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{clear_setting, get_setting, set_setting};
use anyhow::Result;
use rusqlite::Connection;

const ACTIVE_PROFILE_KEY: &str = "active_profile";

/// One of the two fixed household members. The credential check is a static
/// table lookup, not a security boundary.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub name: &'static str,
    pub subtitle: &'static str,
    password: &'static str,
}

pub const PROFILES: [Profile; 2] = [
    Profile {
        name: "Nova",
        subtitle: "Ayah Nova",
        password: "SayangNia",
    },
    Profile {
        name: "Nia",
        subtitle: "Bunda Nia",
        password: "SayangNova",
    },
];

pub fn verify(name: &str, password: &str) -> Option<&'static Profile> {
    PROFILES
        .iter()
        .find(|p| p.name == name && p.password == password)
}

/// Verify the credential pair and record the active profile. A bad pair is a
/// recoverable error reported inline; there is no lockout or throttle.
pub fn login(conn: &Connection, name: &str, password: &str) -> Result<&'static Profile> {
    let profile =
        verify(name, password).ok_or_else(|| anyhow::anyhow!("Wrong username or password"))?;
    set_setting(conn, ACTIVE_PROFILE_KEY, profile.name)?;
    Ok(profile)
}

pub fn logout(conn: &Connection) -> Result<()> {
    clear_setting(conn, ACTIVE_PROFILE_KEY)
}

pub fn active_profile(conn: &Connection) -> Result<Option<String>> {
    get_setting(conn, ACTIVE_PROFILE_KEY)
}

/// The active profile name, or an error telling the user to log in.
pub fn require_login(conn: &Connection) -> Result<String> {
    active_profile(conn)?.ok_or_else(|| anyhow::anyhow!("Not logged in; run `famledger login`"))
}
