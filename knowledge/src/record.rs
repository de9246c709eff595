//! Input and output record types.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One knowledge base entry as read from the input file.
///
/// Fields are kept as whatever JSON value the input used and written back
/// unchanged; `title` and `text` are only read as text when embedding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
}

impl KnowledgeRecord {
    /// Identifier for log lines, `N/A` when absent.
    pub fn display_id(&self) -> String {
        match &self.id {
            None | Some(Value::Null) => "N/A".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Text sent to the embedding model: `"{title}. {text}"`, trimmed.
    ///
    /// Non-string values are rendered as JSON text (`2024`, `true`); null
    /// counts as absent. Returns `None` when neither field carries any
    /// non-whitespace text.
    pub fn embeddable_text(&self) -> Option<String> {
        let title = field_text(self.title.as_ref());
        let text = field_text(self.text.as_ref());
        if title.trim().is_empty() && text.trim().is_empty() {
            return None;
        }
        Some(format!("{title}. {text}").trim().to_string())
    }

    /// Attaches an embedding, consuming the record.
    pub fn augment(self, embedding: Vec<f64>) -> AugmentedRecord {
        AugmentedRecord {
            id: self.id,
            title: self.title,
            text: self.text,
            embedding,
        }
    }
}

fn field_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// A knowledge record together with its embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedRecord {
    pub id: Option<Value>,
    pub title: Option<Value>,
    pub text: Option<Value>,
    pub embedding: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(title: Option<&str>, text: Option<&str>) -> KnowledgeRecord {
        KnowledgeRecord {
            id: Some(json!("kb-1")),
            title: title.map(Value::from),
            text: text.map(Value::from),
        }
    }

    #[test]
    fn title_and_text_joined() {
        let r = record(Some("Foo"), Some("Bar baz."));
        assert_eq!(r.embeddable_text().as_deref(), Some("Foo. Bar baz."));
    }

    #[test]
    fn missing_text_keeps_title_separator() {
        let r = record(Some("Water filters"), None);
        assert_eq!(r.embeddable_text().as_deref(), Some("Water filters."));
    }

    #[test]
    fn missing_title_keeps_leading_separator() {
        let r = record(None, Some("  Boil for one minute.  "));
        assert_eq!(r.embeddable_text().as_deref(), Some(". Boil for one minute."));
    }

    #[test]
    fn blank_fields_yield_nothing() {
        assert_eq!(record(None, None).embeddable_text(), None);
        assert_eq!(record(Some("  "), Some("\n\t")).embeddable_text(), None);
    }

    #[test]
    fn non_string_fields_are_stringified() {
        let r = KnowledgeRecord {
            id: None,
            title: Some(json!(2024)),
            text: Some(json!("Year")),
        };
        assert_eq!(r.embeddable_text().as_deref(), Some("2024. Year"));

        let flag = KnowledgeRecord {
            title: Some(json!(true)),
            text: Some(Value::Null),
            ..Default::default()
        };
        assert_eq!(flag.embeddable_text().as_deref(), Some("true."));
    }

    #[test]
    fn original_field_values_written_back() {
        let out = KnowledgeRecord {
            id: Some(json!("b")),
            title: Some(json!(2024)),
            text: Some(json!("Year")),
        }
        .augment(vec![0.25]);
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({"id": "b", "title": 2024, "text": "Year", "embedding": [0.25]})
        );
    }

    #[test]
    fn display_id_variants() {
        assert_eq!(record(None, None).display_id(), "kb-1");
        let numeric = KnowledgeRecord {
            id: Some(json!(42)),
            ..Default::default()
        };
        assert_eq!(numeric.display_id(), "42");
        assert_eq!(KnowledgeRecord::default().display_id(), "N/A");
    }

    #[test]
    fn augmented_serializes_nulls_in_order() {
        let out = KnowledgeRecord {
            id: Some(json!(7)),
            title: Some("Café".into()),
            text: None,
        }
        .augment(vec![0.5, -1.0]);
        let s = serde_json::to_string(&out).unwrap();
        assert_eq!(
            s,
            r#"{"id":7,"title":"Café","text":null,"embedding":[0.5,-1.0]}"#
        );
    }
}
