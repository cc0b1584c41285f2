//! JSON Lines records.

use super::Annotation;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key under which the annotation is stored.
pub const INFO_KEY: &str = "info";

/// One document of the corpus.
///
/// Fields other than the typed ones are kept in `extra` and written back
/// unchanged. Members are written in the order they were read; new members
/// go last.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    key_order: Vec<String>,
}

impl Record {
    /// Creates a record holding only `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            title: None,
            lang: None,
            id: None,
            extra: Map::new(),
            key_order: Vec::new(),
        }
    }

    /// Sets the source URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the gold language label.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Parses one line of a JSON Lines stream.
    ///
    /// The line must hold a JSON object whose `text` member is a string.
    pub fn from_json_line(line: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| Error::RecordParse(e.to_string()))?;
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(Error::RecordParse(format!(
                    "expected a JSON object, found {}",
                    kind(&other)
                )))
            }
        };
        if !matches!(object.get("text"), Some(Value::String(_))) {
            return Err(Error::MissingField("text"));
        }
        let key_order = object.keys().cloned().collect();
        let mut record: Self = serde_json::from_value(Value::Object(object))
            .map_err(|e| Error::RecordParse(e.to_string()))?;
        record.key_order = key_order;
        Ok(record)
    }

    /// Serializes the record as a single line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Attaches `annotation` as the `info` member, replacing any previous one.
    pub fn set_info(&mut self, annotation: &Annotation) -> Result<()> {
        self.set_field(INFO_KEY, annotation)
    }

    /// Reads back the `info` member, if present and well-formed.
    pub fn info(&self) -> Option<Annotation> {
        self.extra
            .get(INFO_KEY)
            .and_then(|v| Annotation::deserialize(v).ok())
    }

    /// Sets an arbitrary extra member.
    pub fn set_field<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        self.extra.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    fn typed_members(&self) -> Map<String, Value> {
        let mut typed = Map::new();
        typed.insert("text".to_string(), Value::String(self.text.clone()));
        let optional = [
            ("url", self.url.clone().map(Value::String)),
            ("title", self.title.clone().map(Value::String)),
            ("lang", self.lang.clone().map(Value::String)),
            ("id", self.id.clone()),
        ];
        for (key, value) in optional {
            // A member read as null stays null.
            if let Some(value) = value.or_else(|| self.has_key(key).then_some(Value::Null)) {
                typed.insert(key.to_string(), value);
            }
        }
        typed
    }

    fn has_key(&self, key: &str) -> bool {
        self.key_order.iter().any(|k| k == key)
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut typed = self.typed_members();
        let mut object = Map::with_capacity(typed.len() + self.extra.len());
        for key in &self.key_order {
            if let Some(value) = typed.remove(key).or_else(|| self.extra.get(key).cloned()) {
                object.insert(key.clone(), value);
            }
        }
        object.extend(typed);
        for (key, value) in &self.extra {
            if !object.contains_key(key) {
                object.insert(key.clone(), value.clone());
            }
        }
        object
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_object().serialize(serializer)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
