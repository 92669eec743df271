//! Flat CSV store for candidate records, keyed by email.
//!
//! One file, one header row, append-on-submit. Absent fields round-trip as
//! `N/A`. A mutex serializes read-modify-write sequences within this
//! process; cross-process locking and durability are out of scope.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::candidate::{CandidateRecord, Status};

pub const HEADERS: [&str; 7] = [
    "Name", "Email", "Phone", "College", "Degree", "CGPA", "Status",
];

const MISSING: &str = "N/A";

pub struct CsvStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a record, assigning `Pending` status. Returns `false` without
    /// writing when the email is already present (case-insensitive).
    pub fn append(&self, record: &CandidateRecord) -> Result<bool> {
        let _guard = self.lock.lock().unwrap();

        if let Some(email) = record.email.as_deref() {
            if self.contains_email_locked(email)? {
                warn!("Duplicate email rejected: {email}");
                return Ok(false);
            }
        }

        let needs_header = !self.has_header()?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        if needs_header {
            writer.write_record(HEADERS)?;
        }
        writer.write_record(to_row(record, Status::Pending))?;
        writer.flush()?;

        info!("Saved candidate to {}", self.path.display());
        Ok(true)
    }

    pub fn list_all(&self) -> Result<Vec<CandidateRecord>> {
        let _guard = self.lock.lock().unwrap();
        self.read_all_locked()
    }

    /// Records whose CGPA parses to at least `min`. Rows with absent or
    /// non-numeric CGPA text are skipped.
    pub fn filter_by_min_cgpa(&self, min: f64) -> Result<Vec<CandidateRecord>> {
        let _guard = self.lock.lock().unwrap();
        Ok(self
            .read_all_locked()?
            .into_iter()
            .filter(|r| r.cgpa_value().is_some_and(|v| v >= min))
            .collect())
    }

    /// Rewrites the status of every row matching `email` (case-insensitive).
    /// Returns `false` when no row matched or the store file does not exist.
    pub fn set_status(&self, email: &str, status: Status) -> Result<bool> {
        let _guard = self.lock.lock().unwrap();

        if !self.path.is_file() {
            return Ok(false);
        }

        let mut records = self.read_all_locked()?;
        let mut changed = false;
        for record in &mut records {
            let matches = record
                .email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(email));
            if matches {
                record.status = status;
                changed = true;
            }
        }

        if changed {
            self.write_all_locked(&records)?;
            info!("Updated status for {email} to {status}");
        }
        Ok(changed)
    }

    /// Serializes the whole store to a spreadsheet (CSV) byte buffer for
    /// download.
    pub fn export(&self) -> Result<Vec<u8>> {
        let _guard = self.lock.lock().unwrap();
        let records = self.read_all_locked()?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADERS)?;
        for record in &records {
            writer.write_record(to_row(record, record.status))?;
        }
        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("CSV export failed: {}", e.error()))
    }

    fn read_all_locked(&self) -> Result<Vec<CandidateRecord>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(from_row(&row));
        }
        Ok(records)
    }

    fn write_all_locked(&self, records: &[CandidateRecord]) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        writer.write_record(HEADERS)?;
        for record in records {
            writer.write_record(to_row(record, record.status))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn contains_email_locked(&self, email: &str) -> Result<bool> {
        Ok(self.read_all_locked()?.iter().any(|r| {
            r.email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(email))
        }))
    }

    fn has_header(&self) -> Result<bool> {
        if !self.path.is_file() {
            return Ok(false);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let first_line = content.lines().next().unwrap_or("");
        Ok(first_line.contains("Name") && first_line.contains("Email"))
    }
}

fn to_row(record: &CandidateRecord, status: Status) -> [String; 7] {
    let cell = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());
    [
        cell(&record.name),
        cell(&record.email),
        cell(&record.phone),
        cell(&record.college),
        cell(&record.degree),
        cell(&record.cgpa),
        status.to_string(),
    ]
}

fn from_row(row: &csv::StringRecord) -> CandidateRecord {
    let cell = |i: usize| {
        row.get(i)
            .filter(|v| !v.is_empty() && *v != MISSING)
            .map(String::from)
    };
    CandidateRecord {
        name: cell(0),
        email: cell(1),
        phone: cell(2),
        college: cell(3),
        degree: cell(4),
        cgpa: cell(5),
        status: row
            .get(6)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
    }
}
