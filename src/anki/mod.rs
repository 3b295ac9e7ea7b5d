use std::{
    collections::HashMap,
    time::Duration,
};

use reqwest::blocking::Client;
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};
use serde_json::Value;

use crate::core::{
    AnkiflowError,
    NotePayload,
};

pub mod gateway;
pub mod lifecycle;

pub use gateway::{
    publish_card,
    Publisher,
};

pub const DEFAULT_URL: &str = "http://localhost:8765/";
const API_VERSION: u32 = 6;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

/// Stored note as returned by `notesInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    pub note_id: u64,
    pub model_name: String,
    pub tags: Vec<String>,
    pub fields: HashMap<String, FieldValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: String,
    pub order: u32,
}

/// Blocking client for the AnkiConnect automation API. Requests carry a
/// fixed timeout so a wedged Anki never hangs the review loop.
pub struct AnkiClient {
    url: String,
    client: Client,
}

impl AnkiClient {
    pub fn new() -> Result<Self, AnkiflowError> {
        Self::with_url(DEFAULT_URL)
    }

    pub fn with_url(url: &str) -> Result<Self, AnkiflowError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AnkiflowError::Custom(format!("HTTP client build failed: {e}")))?;
        Ok(AnkiClient { url: url.to_string(), client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts one `{action, version, params}` envelope. Transport failures
    /// mean AnkiConnect is unreachable; a non-null `error` field means it
    /// rejected the request. Actions like `deleteNotes` legitimately return
    /// a null result, hence the `Option`.
    fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<Value>,
    ) -> Result<Option<T>, AnkiflowError> {
        let mut body = serde_json::Map::new();
        body.insert("action".to_string(), Value::String(action.to_string()));
        body.insert("version".to_string(), Value::Number(API_VERSION.into()));
        if let Some(params) = params {
            body.insert("params".to_string(), params);
        }

        let response = self.client.post(&self.url).json(&body).send().map_err(|e| {
            AnkiflowError::AnkiUnavailable(format!(
                "{} at {}. Make sure Anki is running with AnkiConnect installed.",
                e, self.url
            ))
        })?;

        let parsed: ApiResponse<T> = response
            .json()
            .map_err(|e| AnkiflowError::Custom(format!("Unexpected AnkiConnect response: {e}")))?;

        if let Some(error) = parsed.error {
            return Err(AnkiflowError::AnkiRejected(error));
        }
        Ok(parsed.result)
    }

    fn invoke_expecting<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<Value>,
    ) -> Result<T, AnkiflowError> {
        self.invoke(action, params)?.ok_or_else(|| {
            AnkiflowError::Custom(format!("AnkiConnect returned no result for {action}"))
        })
    }

    /// Liveness probe: true when AnkiConnect answers `version`.
    pub fn ping(&self) -> bool {
        self.invoke::<u32>("version", None).is_ok()
    }

    pub fn deck_names(&self) -> Result<Vec<String>, AnkiflowError> {
        self.invoke_expecting("deckNames", None)
    }

    pub fn model_names(&self) -> Result<Vec<String>, AnkiflowError> {
        self.invoke_expecting("modelNames", None)
    }

    /// Creates one note. AnkiConnect's own deck-scoped duplicate detection
    /// is left on, so resubmitting an identical card surfaces as a
    /// rejection rather than a second note.
    pub fn add_note(&self, note: &NotePayload) -> Result<u64, AnkiflowError> {
        let params = serde_json::json!({ "note": note_with_options(note)? });
        self.invoke_expecting("addNote", Some(params))
    }

    /// Batch creation for the unreviewed bulk-add path. One id-or-null per
    /// input note, nulls marking rejected (usually duplicate) entries.
    pub fn add_notes(&self, notes: &[NotePayload]) -> Result<Vec<Option<u64>>, AnkiflowError> {
        let formatted: Vec<Value> =
            notes.iter().map(note_with_options).collect::<Result<_, _>>()?;
        let params = serde_json::json!({ "notes": formatted });
        self.invoke_expecting("addNotes", Some(params))
    }

    pub fn find_notes(&self, query: &str) -> Result<Vec<u64>, AnkiflowError> {
        let params = serde_json::json!({ "query": query });
        self.invoke_expecting("findNotes", Some(params))
    }

    pub fn notes_info(&self, note_ids: &[u64]) -> Result<Vec<NoteInfo>, AnkiflowError> {
        let params = serde_json::json!({ "notes": note_ids });
        self.invoke_expecting("notesInfo", Some(params))
    }

    pub fn delete_notes(&self, note_ids: &[u64]) -> Result<(), AnkiflowError> {
        let params = serde_json::json!({ "notes": note_ids });
        self.invoke::<Value>("deleteNotes", Some(params))?;
        Ok(())
    }
}

fn note_with_options(note: &NotePayload) -> Result<Value, AnkiflowError> {
    let mut value = serde_json::to_value(note)?;
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "options".to_string(),
            serde_json::json!({
                "allowDuplicate": false,
                "duplicateScope": "deck",
            }),
        );
    }
    Ok(value)
}
