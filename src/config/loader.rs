//! Declaration file loading and the named schema catalog.
//!
//! A catalog directory holds one `*.json` file per record declaration; the
//! file stem becomes the schema name. Files are built eagerly at load time
//! so malformed declarations fail at startup, not at first use.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::schema::RecordSchema;

use super::builder::build_schema;
use super::errors::{BuildError, BuildResult};

/// In-memory catalog of built record schemas keyed by name.
pub struct SchemaCatalog {
    dir: PathBuf,
    schemas: HashMap<String, RecordSchema>,
}

impl SchemaCatalog {
    /// Creates an empty catalog rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            schemas: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads every `*.json` declaration file in the catalog directory.
    ///
    /// A missing directory is treated as an empty catalog. Non-JSON files
    /// are skipped. The first malformed declaration aborts the load.
    pub fn load_all(&mut self) -> BuildResult<()> {
        if !self.dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.dir).map_err(|err| BuildError::FileRead {
            path: self.dir.display().to_string(),
            reason: err.to_string(),
        })?;

        for entry in entries {
            let entry = entry.map_err(|err| BuildError::FileRead {
                path: self.dir.display().to_string(),
                reason: err.to_string(),
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            self.load_file(&path)?;
        }

        info!(count = self.schemas.len(), "schema catalog loaded");
        Ok(())
    }

    /// Loads a single declaration file, keying the schema by file stem.
    pub fn load_file(&mut self, path: &Path) -> BuildResult<()> {
        let content = fs::read_to_string(path).map_err(|err| BuildError::FileRead {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        let declaration: Value =
            serde_json::from_str(&content).map_err(|err| BuildError::FileParse {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

        let fields = declaration.as_object().ok_or_else(|| BuildError::FileParse {
            path: path.display().to_string(),
            reason: "expected a top-level object of field declarations".to_string(),
        })?;

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();

        let schema = build_schema(fields)?;
        debug!(schema = %name, fields = schema.len(), "loaded schema declaration");
        self.insert(name, schema)
    }

    /// Builds and registers a declaration directly (programmatic use and
    /// tests).
    pub fn register(&mut self, name: impl Into<String>, fields: &Map<String, Value>) -> BuildResult<()> {
        let schema = build_schema(fields)?;
        self.insert(name.into(), schema)
    }

    fn insert(&mut self, name: String, schema: RecordSchema) -> BuildResult<()> {
        if self.schemas.contains_key(&name) {
            return Err(BuildError::AlreadyRegistered(name));
        }

        self.schemas.insert(name, schema);
        Ok(())
    }

    /// The built schema for a name, if registered.
    pub fn get(&self, name: &str) -> Option<&RecordSchema> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
