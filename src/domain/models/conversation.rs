#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
use std::fmt;

use serde::de;
use serde::Deserializer;
use serde::Serializer;
use serde_derive::Deserialize;

/// Opaque conversation identifier. The service is free to hand out numeric or
/// string ids; either is kept verbatim and round-tripped in its original JSON
/// form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(raw: &str) -> ConversationId {
        return ConversationId(raw.to_string());
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Text(String),
}

impl<'de> serde::Deserialize<'de> for ConversationId {
    fn deserialize<D>(deserializer: D) -> Result<ConversationId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = <IdRepr as serde::Deserialize>::deserialize(deserializer)
            .map_err(|_| return de::Error::custom("conversation id must be a string or integer"))?;

        match repr {
            IdRepr::Int(id) => return Ok(ConversationId(id.to_string())),
            IdRepr::Text(id) => return Ok(ConversationId(id)),
        }
    }
}

impl serde::Serialize for ConversationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Ok(id) = self.0.parse::<i64>() {
            return serializer.serialize_i64(id);
        }

        return serializer.serialize_str(&self.0);
    }
}

/// A sidebar entry from the service's list operation. The preview is whatever
/// the service chose to surface, usually the last message, and may be absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub preview: Option<String>,
}

impl ConversationSummary {
    pub fn label(&self, fallback_index: usize) -> String {
        if let Some(preview) = &self.preview {
            let line = preview.split('\n').next().unwrap_or("").trim();
            if !line.is_empty() {
                return line.to_string();
            }
        }

        let n = fallback_index + 1;
        return format!("Chat {n}");
    }
}
