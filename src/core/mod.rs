pub mod card;
pub mod errors;
pub mod store;
pub mod validate;

pub use card::{
    Card,
    CardStatus,
    NotePayload,
};
pub use errors::AnkiflowError;
pub use store::{
    load_cards,
    save_cards,
};
pub use validate::{
    validate_card,
    Severity,
    ValidationWarning,
};
