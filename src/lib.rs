// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod cli;
pub mod db;
pub mod ledger;
pub mod mirror;
pub mod models;
pub mod reconcile;
pub mod sync;
pub mod utils;
pub mod commands;
