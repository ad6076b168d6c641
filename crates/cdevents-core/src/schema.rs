//! JSON Schema validation of serialized events.
//!
//! Schema documents are supplied by a [`SchemaSource`] and compiled once when
//! a [`SchemaRegistry`] is built. Each document is keyed by [`schema_key`] of
//! the event type it describes (`dev.cdevents.build.finished.0.3.0` →
//! `buildfinished`), which is also the file stem on disk.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cloudevent::CloudEvent;
use crate::error::{CDEventError, Result};
use crate::obs;
use crate::registry::TypeName;

/// One place where a body does not satisfy its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// JSON pointer into the validated body, e.g. `/subject/content/artifactId`.
    pub instance_path: String,
    /// JSON pointer into the schema keyword that failed.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        };
        write!(f, "{path}: {}", self.message)
    }
}

/// Schema lookup key for a type string: domain and action concatenated.
///
/// # Errors
///
/// `UnknownEventType` when `event_type` is not a CDEvents type string.
pub fn schema_key(event_type: &str) -> Result<String> {
    let name = TypeName::parse(event_type).ok_or_else(|| CDEventError::unknown_type(event_type))?;
    Ok(format!("{}{}", name.domain, name.action))
}

/// Supplier of raw schema documents, keyed by [`schema_key`].
pub trait SchemaSource {
    fn documents(&self) -> Result<Vec<(String, Value)>>;
}

/// Every `*.json` file in a directory; the file stem is the key.
#[derive(Debug, Clone)]
pub struct DirectorySchemaSource {
    dir: PathBuf,
}

impl DirectorySchemaSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySchemaSource { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SchemaSource for DirectorySchemaSource {
    fn documents(&self) -> Result<Vec<(String, Value)>> {
        let mut documents = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = fs::read_to_string(&path)?;
            let document = parse_document(key, &text)?;
            documents.push((key.to_string(), document));
        }
        documents.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(dir = %self.dir.display(), count = documents.len(), "loaded schema documents");
        Ok(documents)
    }
}

macro_rules! bundled {
    ($($key:literal),* $(,)?) => {
        &[$(($key, include_str!(concat!("../schemas/", $key, ".json")))),*]
    };
}

const BUNDLED: &[(&str, &str)] = bundled![
    "repositorycreated",
    "repositorymodified",
    "repositorydeleted",
    "branchcreated",
    "branchdeleted",
    "changecreated",
    "changeupdated",
    "changereviewed",
    "changemerged",
    "changeabandoned",
    "buildqueued",
    "buildstarted",
    "buildfinished",
    "testcaserunqueued",
    "testcaserunstarted",
    "testcaserunfinished",
    "pipelinerunqueued",
    "pipelinerunstarted",
    "pipelinerunfinished",
    "taskrunstarted",
    "taskrunfinished",
    "artifactpackaged",
    "artifactpublished",
    "environmentcreated",
    "environmentmodified",
    "environmentdeleted",
    "servicedeployed",
    "serviceupgraded",
    "servicerolledback",
    "serviceremoved",
    "servicepublished",
];

/// The schema set compiled into the library, one per catalogue entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSchemas;

impl SchemaSource for BundledSchemas {
    fn documents(&self) -> Result<Vec<(String, Value)>> {
        BUNDLED
            .iter()
            .map(|(key, text)| Ok((key.to_string(), parse_document(key, text)?)))
            .collect()
    }
}

fn parse_document(key: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| CDEventError::InvalidSchema {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Outcome of validating one body. An empty violation list means valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub event_type: String,
    pub violations: Vec<SchemaViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Turn violations into `SchemaValidationFailed`.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        Err(CDEventError::SchemaValidationFailed {
            event_type: self.event_type,
            violations: self.violations,
        })
    }
}

/// Compiled schemas, read-only after construction.
pub struct SchemaRegistry {
    schemas: BTreeMap<String, JSONSchema>,
}

impl SchemaRegistry {
    /// Compile every document from `source`.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` when a document does not compile; `Io` when the source
    /// cannot be read.
    pub fn from_source(source: &dyn SchemaSource) -> Result<Self> {
        Self::from_documents(source.documents()?)
    }

    pub fn from_documents(documents: impl IntoIterator<Item = (String, Value)>) -> Result<Self> {
        let mut schemas = BTreeMap::new();
        for (key, document) in documents {
            let compiled = JSONSchema::compile(&document).map_err(|e| {
                CDEventError::InvalidSchema {
                    key: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            schemas.insert(key, compiled);
        }
        debug!(count = schemas.len(), "schema registry compiled");
        Ok(SchemaRegistry { schemas })
    }

    /// Load schemas from a directory of `<key>.json` files.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_source(&DirectorySchemaSource::new(dir.as_ref()))
    }

    /// The schemas bundled with the library.
    pub fn bundled() -> Result<Self> {
        Self::from_source(&BundledSchemas)
    }

    /// Is there a schema for this type string?
    pub fn contains(&self, event_type: &str) -> bool {
        schema_key(event_type).is_ok_and(|key| self.schemas.contains_key(&key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Check `body` against the schema for `event_type`.
    ///
    /// Violations are data in the returned report, not errors.
    ///
    /// # Errors
    ///
    /// `UnknownEventType` when the type string cannot be parsed;
    /// `SchemaNotFound` when no schema is loaded under its key.
    pub fn validate(&self, event_type: &str, body: &Value) -> Result<ValidationReport> {
        let key = schema_key(event_type)?;
        let schema = self
            .schemas
            .get(&key)
            .ok_or_else(|| CDEventError::SchemaNotFound {
                event_type: event_type.to_string(),
                key: key.clone(),
            })?;

        let violations = match schema.validate(body) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| SchemaViolation {
                    instance_path: error.instance_path.to_string(),
                    schema_path: error.schema_path.to_string(),
                    message: error.to_string(),
                })
                .collect(),
        };

        obs::emit_schema_validated(event_type, violations.len());
        Ok(ValidationReport {
            event_type: event_type.to_string(),
            violations,
        })
    }

    /// Check the `data` of a cloud event against the schema named by its `type`.
    pub fn validate_cloud_event(&self, envelope: &CloudEvent) -> Result<ValidationReport> {
        self.validate(&envelope.r#type, &envelope.data)
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("keys", &self.schemas.keys().collect::<Vec<_>>())
            .finish()
    }
}
