//! Subjects: what an event is about.
//!
//! A [`Subject`] is generic over its content type. The content type carries
//! the subject's discriminant (`SUBJECT_TYPE`), so a subject can never hold
//! content that disagrees with its `type` tag.

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{require_non_empty, CDEventError, Result};

/// Variant-specific subject payload.
pub trait SubjectContent:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Discriminant written to `subject.type` (e.g. `"build"`).
    const SUBJECT_TYPE: &'static str;

    /// Check content invariants (required identifiers present, etc.).
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// The entity an event describes.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject<C> {
    id: String,
    source: String,
    content: C,
}

impl<C: SubjectContent> Subject<C> {
    pub(crate) fn new(id: String, source: String, content: C) -> Result<Self> {
        require_non_empty("subject id", &id)?;
        require_non_empty("subject source", &source)?;
        content.validate()?;
        Ok(Subject {
            id,
            source,
            content,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Defaults to the context source when none was given.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn subject_type(&self) -> &'static str {
        C::SUBJECT_TYPE
    }

    pub fn content(&self) -> &C {
        &self.content
    }
}

impl<C: SubjectContent> Serialize for Subject<C> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Subject", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("type", C::SUBJECT_TYPE)?;
        state.serialize_field("content", &self.content)?;
        state.end()
    }
}

/// Subject as read off the wire, before its type tag is checked.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSubject {
    id: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(rename = "type")]
    subject_type: String,
    #[serde(default)]
    content: Value,
}

impl RawSubject {
    /// Check the discriminant, parse the content and default the source.
    pub(crate) fn resolve<C: SubjectContent>(self, default_source: &str) -> Result<Subject<C>> {
        if self.subject_type != C::SUBJECT_TYPE {
            return Err(CDEventError::malformed(format!(
                "subject type '{}' does not match expected '{}'",
                self.subject_type,
                C::SUBJECT_TYPE
            )));
        }

        let content = match self.content {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let content: C = serde_json::from_value(content).map_err(|e| {
            CDEventError::malformed(format!(
                "invalid {} subject content: {e}",
                C::SUBJECT_TYPE
            ))
        })?;

        let source = self.source.unwrap_or_else(|| default_source.to_string());
        Subject::new(self.id, source, content).map_err(into_malformed)
    }
}

/// A pointer to another entity by id (and optionally its source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Reference {
            id: id.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub(crate) fn validate(&self, field: &str) -> Result<()> {
        require_non_empty(&format!("{field} id"), &self.id)
    }
}

/// Validation failures found while decoding are payload problems, not caller mistakes.
pub(crate) fn into_malformed(err: CDEventError) -> CDEventError {
    match err {
        CDEventError::InvalidArgument(msg) => CDEventError::MalformedPayload(msg),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct WidgetContent {
        widget_name: String,
    }

    impl SubjectContent for WidgetContent {
        const SUBJECT_TYPE: &'static str = "widget";

        fn validate(&self) -> Result<()> {
            require_non_empty("widget name", &self.widget_name)
        }
    }

    fn widget(name: &str) -> WidgetContent {
        WidgetContent {
            widget_name: name.to_string(),
        }
    }

    #[test]
    fn test_subject_serializes_type_tag() {
        let subject = Subject::new("w-1".to_string(), "/src".to_string(), widget("gear")).unwrap();
        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(
            json,
            json!({"id": "w-1", "source": "/src", "type": "widget", "content": {"widgetName": "gear"}})
        );
    }

    #[test]
    fn test_subject_rejects_invalid_content() {
        let result = Subject::new("w-1".to_string(), "/src".to_string(), widget(""));
        assert!(matches!(result, Err(CDEventError::InvalidArgument(_))));
    }

    #[test]
    fn test_raw_subject_defaults_source() {
        let raw: RawSubject = serde_json::from_value(json!({
            "id": "w-1",
            "type": "widget",
            "content": {"widgetName": "gear"}
        }))
        .unwrap();
        let subject: Subject<WidgetContent> = raw.resolve("/ctx").unwrap();
        assert_eq!(subject.source(), "/ctx");
    }

    #[test]
    fn test_raw_subject_rejects_wrong_type() {
        let raw: RawSubject = serde_json::from_value(json!({
            "id": "w-1",
            "type": "gadget",
            "content": {"widgetName": "gear"}
        }))
        .unwrap();
        let result: Result<Subject<WidgetContent>> = raw.resolve("/ctx");
        assert!(matches!(result, Err(CDEventError::MalformedPayload(_))));
    }

    #[test]
    fn test_raw_subject_invalid_content_is_malformed() {
        let raw: RawSubject = serde_json::from_value(json!({
            "id": "w-1",
            "type": "widget",
            "content": {"widgetName": ""}
        }))
        .unwrap();
        let result: Result<Subject<WidgetContent>> = raw.resolve("/ctx");
        assert!(matches!(result, Err(CDEventError::MalformedPayload(_))));
    }

    #[test]
    fn test_reference_skips_missing_source() {
        let json = serde_json::to_value(Reference::new("repo-1")).unwrap();
        assert_eq!(json, json!({"id": "repo-1"}));

        let json = serde_json::to_value(Reference::new("repo-1").with_source("/scm")).unwrap();
        assert_eq!(json, json!({"id": "repo-1", "source": "/scm"}));
    }
}
