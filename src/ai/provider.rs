use crate::error::ProviderError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{json, Map, Value};

/// Lazy, single-pass sequence of text fragments for one chat exchange.
pub type FragmentStream = BoxStream<'static, Result<String, ProviderError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    StringArray { len: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

impl SchemaField {
    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            description,
        }
    }

    pub fn string_array(name: &'static str, len: usize, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::StringArray { len: Some(len) },
            description,
        }
    }
}

/// Declared output shape of a structured generation: an array of objects whose
/// fields are all required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    pub item_fields: Vec<SchemaField>,
}

impl OutputSchema {
    pub fn array_of(item_fields: Vec<SchemaField>) -> Self {
        Self { item_fields }
    }

    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.item_fields {
            let mut prop = match field.kind {
                FieldKind::String => json!({ "type": "string" }),
                FieldKind::StringArray { len } => {
                    let mut arr = json!({ "type": "array", "items": { "type": "string" } });
                    if let Some(n) = len {
                        arr["minItems"] = json!(n);
                        arr["maxItems"] = json!(n);
                    }
                    arr
                }
            };
            prop["description"] = json!(field.description);
            properties.insert(field.name.to_string(), prop);
        }

        let required: Vec<&str> = self.item_fields.iter().map(|f| f.name).collect();

        json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

/// The external text-generation capability.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Single-shot generation expected to return JSON text matching `schema`.
    async fn generate(&self, prompt: &str, schema: &OutputSchema) -> Result<String, ProviderError>;

    /// Open a conversational session. The session keeps its own history.
    fn create_session(&self, system_prompt: &str) -> Box<dyn ChatSession>;
}

#[async_trait]
pub trait ChatSession: Send {
    async fn send_streaming(&mut self, message: &str) -> Result<FragmentStream, ProviderError>;
}
