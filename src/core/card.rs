use std::collections::HashMap;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Review lifecycle of a single card. `Added` and `Skipped` are terminal
/// under normal flow; only a reset moves a card back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    Pending,
    Skipped,
    Added,
}

/// One flashcard as stored in a card file. Unknown keys are rejected so a
/// typoed field in a generated file fails loudly instead of vanishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Card {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_deck")]
    pub deck: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default)]
    pub anki_id: Option<u64>,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

fn default_deck() -> String {
    "Default".to_string()
}

fn default_model() -> String {
    "Basic".to_string()
}

/// The body of an AnkiConnect `addNote`/`addNotes` call, minus the
/// duplicate-handling options the client fills in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub deck_name: String,
    pub model_name: String,
    pub fields: HashMap<String, String>,
    pub tags: Vec<String>,
}

/// Anki renders note fields as HTML, so literal newlines collapse. Normalize
/// every line ending to `\n` first so a `\r\n` never becomes two breaks.
pub fn newlines_to_html(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\n', "<br>")
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Card {
            front: front.into(),
            back: back.into(),
            context: String::new(),
            tags: Vec::new(),
            source: String::new(),
            deck: default_deck(),
            model: default_model(),
            status: CardStatus::Pending,
            anki_id: None,
            added_at: None,
        }
    }

    /// Pure rendering of this card into the shape `addNote` expects. Context,
    /// when present, rides along on the back behind a horizontal rule.
    pub fn to_anki_note(&self) -> NotePayload {
        let back_content = if self.context.is_empty() {
            self.back.clone()
        } else {
            format!("{}\n\n---\n\n{}", self.back, self.context)
        };

        let mut fields = HashMap::new();
        fields.insert("Front".to_string(), newlines_to_html(&self.front));
        fields.insert("Back".to_string(), newlines_to_html(&back_content));

        NotePayload {
            deck_name: self.deck.clone(),
            model_name: self.model.clone(),
            fields,
            tags: self.tags.clone(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == CardStatus::Pending
    }

    /// Marks the card as published. The id and timestamp travel together with
    /// the status so the `added` invariant holds after every transition.
    pub fn mark_added(&mut self, anki_id: u64, at: DateTime<Utc>) {
        self.status = CardStatus::Added;
        self.anki_id = Some(anki_id);
        self.added_at = Some(at);
    }

    /// Force the card back to the unreviewed state, clearing publish
    /// bookkeeping regardless of the current status.
    pub fn reset(&mut self) {
        self.status = CardStatus::Pending;
        self.anki_id = None;
        self.added_at = None;
    }
}
