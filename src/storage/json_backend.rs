use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    domain::document::{LedgerDocument, CURRENT_SCHEMA_VERSION},
    errors::LedgerError,
};

use super::{Result, StorageBackend};

const BACKUP_PREFIX: &str = "ledger";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const DEFAULT_RETENTION: usize = 5;

/// Stores the ledger document as pretty-printed JSON under the app home,
/// keeping a bounded set of timestamped backups of previous versions.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    document_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            document_path: PathResolver::document_file_in(&app_root),
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn backup_path(&self, backup_name: &str) -> PathBuf {
        self.backups_dir.join(backup_name)
    }

    fn backup_file_name(note: Option<&str>) -> String {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", BACKUP_PREFIX, timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        format!("{}.{}", stem, BACKUP_EXTENSION)
    }

    fn backup_existing_file(&self, note: Option<&str>) -> Result<Option<String>> {
        if !self.document_path.exists() {
            return Ok(None);
        }
        ensure_dir(&self.backups_dir)?;
        let name = Self::backup_file_name(note);
        fs::copy(&self.document_path, self.backup_path(&name))?;
        debug!(backup = %name, "ledger backed up");
        self.prune_backups()?;
        Ok(Some(name))
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for name in backups.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(self.backup_path(name)) {
                warn!(backup = %name, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<LedgerDocument> {
        if !self.document_path.exists() {
            debug!(path = %self.document_path.display(), "no ledger on disk; starting empty");
            return Ok(LedgerDocument::default());
        }
        load_document_from_path(&self.document_path)
    }

    fn save(&self, document: &LedgerDocument) -> Result<()> {
        self.backup_existing_file(None)?;
        save_document_to_path(document, &self.document_path)
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                if backup_stamp(name).is_some() {
                    entries.push(name.to_string());
                }
            }
        }
        entries.sort_by(|a, b| backup_stamp(b).cmp(&backup_stamp(a)));
        Ok(entries)
    }

    fn backup(&self, note: Option<&str>) -> Result<Option<String>> {
        self.backup_existing_file(note)
    }

    /// Replaces the current document with a backup. The document being
    /// replaced is itself backed up first.
    fn restore(&self, backup_name: &str) -> Result<LedgerDocument> {
        let backup_path = self.backup_path(backup_name);
        if !backup_path.exists() {
            return Err(LedgerError::Persistence(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let document = load_document_from_path(&backup_path)?;
        self.save(&document)?;
        info!(backup = %backup_name, "ledger restored from backup");
        Ok(document)
    }
}

pub fn save_document_to_path(document: &LedgerDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    write_atomic(path, &json)?;
    Ok(())
}

pub fn load_document_from_path(path: &Path) -> Result<LedgerDocument> {
    let data = fs::read_to_string(path)?;
    let document: LedgerDocument = serde_json::from_str(&data)?;
    if document.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(LedgerError::Persistence(format!(
            "`{}` uses schema version {} but only {} is supported",
            path.display(),
            document.schema_version,
            CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(document)
}

/// Creation time encoded in a backup file name.
pub fn backup_created_at(name: &str) -> Option<DateTime<Utc>> {
    let stamp = backup_stamp(name)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// `ledger_20240102_030405678_note.json` -> `20240102_030405678`.
fn backup_stamp(name: &str) -> Option<&str> {
    let stem = name.strip_suffix(".json")?;
    let rest = stem.strip_prefix(BACKUP_PREFIX)?.strip_prefix('_')?;
    let stamp = rest.get(..18)?;
    let (date, time) = stamp.split_once('_')?;
    if !is_digits(date, 8) || !is_digits(time, 9) {
        return None;
    }
    match rest.as_bytes().get(18) {
        None | Some(b'_') => Some(stamp),
        Some(_) => None,
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
