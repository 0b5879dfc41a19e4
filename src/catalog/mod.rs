use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::CatalogError;
use crate::models::ProductRecord;

/// Identifiers served when the catalog is configured as `static`.
pub const STATIC_PRODUCT_IDS: [&str; 5] = ["PROD-001", "PROD-002", "PROD-003", "PROD-004", "PROD-005"];

// ── Source ────────────────────────────────────────────────────────────────────

/// Where catalog records come from. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The built-in five-entry list. Never touches the filesystem.
    Static,
    /// A JSON array of product objects at the given path.
    File(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Static => f.write_str("static"),
            CatalogSource::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Immutable, ordered snapshot of product records.
///
/// Duplicate ids are kept in load order; nothing dedupes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    pub fn static_list() -> Self {
        Self::from_records(
            STATIC_PRODUCT_IDS
                .iter()
                .map(|id| ProductRecord::bare(*id))
                .collect(),
        )
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact, case-sensitive match against each record's id.
    pub fn contains(&self, product_id: &str) -> bool {
        self.records.iter().any(|r| r.id == product_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.id.as_str())
    }
}

// ── Load outcome ──────────────────────────────────────────────────────────────

/// What happened when the catalog was loaded. Surfaced on `/health` only;
/// queries never see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    Loaded { count: usize },
    Unavailable { reason: String },
    Unreadable { reason: String },
    Malformed { reason: String },
}

impl LoadStatus {
    /// True when the catalog fell back to empty because the source failed.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, LoadStatus::Loaded { .. })
    }
}

impl From<&CatalogError> for LoadStatus {
    fn from(err: &CatalogError) -> Self {
        let reason = err.to_string();
        match err {
            CatalogError::SourceUnavailable { .. } => LoadStatus::Unavailable { reason },
            CatalogError::SourceUnreadable { .. } => LoadStatus::Unreadable { reason },
            CatalogError::SourceMalformed { .. } => LoadStatus::Malformed { reason },
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Build a catalog from `source`, surfacing any failure to the caller.
pub fn read_catalog(source: &CatalogSource) -> Result<Catalog, CatalogError> {
    match source {
        CatalogSource::Static => Ok(Catalog::static_list()),
        CatalogSource::File(path) => read_catalog_file(path),
    }
}

fn read_catalog_file(path: &Path) -> Result<Catalog, CatalogError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CatalogError::SourceUnavailable {
            path: path.to_path_buf(),
        },
        _ => CatalogError::SourceUnreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_catalog(path, &bytes)
}

/// The whole document is one parse unit: one bad record discards everything.
fn parse_catalog(path: &Path, bytes: &[u8]) -> Result<Catalog, CatalogError> {
    let records: Vec<ProductRecord> =
        serde_json::from_slice(bytes).map_err(|e| CatalogError::SourceMalformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if let Some(index) = records.iter().position(|r| r.id.is_empty()) {
        return Err(CatalogError::SourceMalformed {
            path: path.to_path_buf(),
            reason: format!("record {} has an empty id", index),
        });
    }

    Ok(Catalog::from_records(records))
}

/// Load the catalog once at startup. Never fails: a missing or broken source
/// degrades to an empty catalog so the service still comes up.
pub fn load(source: &CatalogSource) -> (Catalog, LoadStatus) {
    match read_catalog(source) {
        Ok(catalog) => {
            info!(source = %source, count = catalog.len(), "Loaded product catalog");
            if catalog.is_empty() {
                warn!(source = %source, "Catalog source lists no products");
            }
            let status = LoadStatus::Loaded {
                count: catalog.len(),
            };
            (catalog, status)
        }
        Err(err) => {
            match &err {
                CatalogError::SourceUnavailable { .. } => {
                    warn!(source = %source, error = %err, "Catalog source missing, serving empty catalog")
                }
                _ => error!(source = %source, error = %err, "Catalog source unusable, serving empty catalog"),
            }
            (Catalog::empty(), LoadStatus::from(&err))
        }
    }
}
