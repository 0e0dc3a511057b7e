// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The spreadsheet mirror: a secondary store kept in sync with the ledger on
//! a best-effort basis. Rows carry the transaction id in a dedicated last
//! column (the correlation key); update and delete locate their row by a
//! linear scan of that column.

use crate::utils::{get_setting, http_client, set_setting};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MirrorError {
    /// No row's correlation key matched (the 404 case); indicates prior
    /// divergence between ledger and mirror.
    #[error("mirror row not found")]
    RowNotFound,
    #[error("mirror request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("mirror endpoint returned HTTP {0}")]
    Status(u16),
    #[error("mirror sheet error: {0}")]
    Sheet(String),
}

impl From<csv::Error> for MirrorError {
    fn from(e: csv::Error) -> Self {
        MirrorError::Sheet(e.to_string())
    }
}

impl From<std::io::Error> for MirrorError {
    fn from(e: std::io::Error) -> Self {
        MirrorError::Sheet(e.to_string())
    }
}

/// One sheet row, columns A-F.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorRow {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub user: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
}

pub trait MirrorSink {
    /// Append a new row, correlation key in the last column.
    fn append(&self, row: &MirrorRow) -> Result<(), MirrorError>;
    /// Locate the row whose correlation key matches and overwrite columns
    /// A-E. `RowNotFound` if no row matches.
    fn update(&self, transaction_id: &str, row: &MirrorRow) -> Result<(), MirrorError>;
    /// Locate the row by correlation key and remove it, shifting subsequent
    /// rows up. `RowNotFound` if no row matches.
    fn delete(&self, transaction_id: &str) -> Result<(), MirrorError>;
}

// ---------------------------------------------------------------------------
// Remote mirror: three independent HTTP POST endpoints.

pub struct HttpMirrorSink {
    client: reqwest::blocking::Client,
    append_url: String,
    update_url: String,
    delete_url: String,
}

impl HttpMirrorSink {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client: http_client()?,
            append_url: format!("{}/addToSheet", base),
            update_url: format!("{}/updateSheet", base),
            delete_url: format!("{}/deleteSheet", base),
        })
    }

    fn post(&self, url: &str, body: &serde_json::Value) -> Result<(), MirrorError> {
        let resp = self.client.post(url).json(body).send()?;
        match resp.status().as_u16() {
            200 => Ok(()),
            404 => Err(MirrorError::RowNotFound),
            s => Err(MirrorError::Status(s)),
        }
    }
}

impl MirrorSink for HttpMirrorSink {
    fn append(&self, row: &MirrorRow) -> Result<(), MirrorError> {
        let body = serde_json::to_value(row).map_err(|e| MirrorError::Sheet(e.to_string()))?;
        self.post(&self.append_url, &body)
    }

    fn update(&self, transaction_id: &str, row: &MirrorRow) -> Result<(), MirrorError> {
        let body = json!({
            "transactionId": transaction_id,
            "newData": {
                "date": row.date,
                "description": row.description,
                "category": row.category,
                "amount": row.amount,
                "user": row.user,
            },
        });
        self.post(&self.update_url, &body)
    }

    fn delete(&self, transaction_id: &str) -> Result<(), MirrorError> {
        self.post(&self.delete_url, &json!({ "transactionId": transaction_id }))
    }
}

// ---------------------------------------------------------------------------
// Local mirror: a headerless CSV file with the same row semantics as the
// remote sheet. Also readable, which makes divergence inspectable.

pub struct SheetMirrorSink {
    path: PathBuf,
}

impl SheetMirrorSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows, top to bottom. A missing file is an empty sheet.
    pub fn rows(&self) -> Result<Vec<MirrorRow>, MirrorError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        let mut out = Vec::new();
        for record in rdr.records() {
            let r = record?;
            if r.len() < 6 {
                return Err(MirrorError::Sheet(format!(
                    "short row in {}: expected 6 columns, got {}",
                    self.path.display(),
                    r.len()
                )));
            }
            let amount = r[3]
                .parse::<Decimal>()
                .map_err(|e| MirrorError::Sheet(format!("bad amount '{}': {}", &r[3], e)))?;
            out.push(MirrorRow {
                date: r[0].to_string(),
                description: r[1].to_string(),
                category: r[2].to_string(),
                amount,
                user: r[4].to_string(),
                transaction_id: r[5].to_string(),
            });
        }
        Ok(out)
    }

    fn write_record<W: std::io::Write>(
        wtr: &mut csv::Writer<W>,
        row: &MirrorRow,
    ) -> Result<(), MirrorError> {
        wtr.write_record([
            row.date.as_str(),
            row.description.as_str(),
            row.category.as_str(),
            &row.amount.to_string(),
            row.user.as_str(),
            row.transaction_id.as_str(),
        ])?;
        Ok(())
    }

    fn rewrite(&self, rows: &[MirrorRow]) -> Result<(), MirrorError> {
        let mut wtr = csv::Writer::from_path(&self.path)?;
        for row in rows {
            Self::write_record(&mut wtr, row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn position_of(&self, transaction_id: &str) -> Result<(Vec<MirrorRow>, usize), MirrorError> {
        let rows = self.rows()?;
        match rows.iter().position(|r| r.transaction_id == transaction_id) {
            Some(i) => Ok((rows, i)),
            None => Err(MirrorError::RowNotFound),
        }
    }
}

impl MirrorSink for SheetMirrorSink {
    fn append(&self, row: &MirrorRow) -> Result<(), MirrorError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        Self::write_record(&mut wtr, row)?;
        wtr.flush()?;
        Ok(())
    }

    fn update(&self, transaction_id: &str, row: &MirrorRow) -> Result<(), MirrorError> {
        let (mut rows, i) = self.position_of(transaction_id)?;
        // Columns A-E change; the correlation column keeps its value.
        rows[i] = MirrorRow {
            transaction_id: rows[i].transaction_id.clone(),
            ..row.clone()
        };
        self.rewrite(&rows)
    }

    fn delete(&self, transaction_id: &str) -> Result<(), MirrorError> {
        let (mut rows, i) = self.position_of(transaction_id)?;
        rows.remove(i);
        self.rewrite(&rows)
    }
}

// ---------------------------------------------------------------------------
// Settings-backed sink selection.

const MODE_KEY: &str = "mirror_mode";
const URL_KEY: &str = "mirror_url";
const SHEET_KEY: &str = "mirror_sheet";

#[derive(Debug, Clone)]
pub enum MirrorConfig {
    Http(String),
    Sheet(PathBuf),
}

/// The configured mirror, defaulting to a local sheet next to the database.
pub fn configured(conn: &Connection) -> Result<MirrorConfig> {
    match get_setting(conn, MODE_KEY)?.as_deref() {
        Some("http") => {
            let url = get_setting(conn, URL_KEY)?
                .ok_or_else(|| anyhow::anyhow!("Mirror mode is http but no URL is set"))?;
            Ok(MirrorConfig::Http(url))
        }
        Some("sheet") => {
            let path = get_setting(conn, SHEET_KEY)?
                .map(PathBuf::from)
                .unwrap_or(crate::db::sheet_path()?);
            Ok(MirrorConfig::Sheet(path))
        }
        _ => Ok(MirrorConfig::Sheet(crate::db::sheet_path()?)),
    }
}

pub fn use_http(conn: &Connection, base_url: &str) -> Result<()> {
    set_setting(conn, MODE_KEY, "http")?;
    set_setting(conn, URL_KEY, base_url)
}

pub fn use_sheet(conn: &Connection, path: &Path) -> Result<()> {
    set_setting(conn, MODE_KEY, "sheet")?;
    set_setting(conn, SHEET_KEY, &path.to_string_lossy())
}

pub fn open_sink(conn: &Connection) -> Result<Box<dyn MirrorSink>> {
    Ok(match configured(conn)? {
        MirrorConfig::Http(url) => Box::new(HttpMirrorSink::new(&url)?),
        MirrorConfig::Sheet(path) => Box::new(SheetMirrorSink::new(path)),
    })
}
