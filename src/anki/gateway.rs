use chrono::Utc;

use crate::{
    anki::AnkiClient,
    core::{
        validate::is_publishable,
        AnkiflowError,
        Card,
        CardStatus,
        NotePayload,
    },
};

/// Seam between the review flow and AnkiConnect. Lets the session run
/// against a scripted publisher in tests the same way it runs against the
/// real endpoint.
pub trait Publisher {
    fn add_note(&self, note: &NotePayload) -> Result<u64, AnkiflowError>;
}

impl Publisher for AnkiClient {
    fn add_note(&self, note: &NotePayload) -> Result<u64, AnkiflowError> {
        AnkiClient::add_note(self, note)
    }
}

/// Publishes one card, idempotently with respect to repeated approvals.
///
/// A card that is already `added` with a stored id is returned as-is with no
/// network call, so a double-approve (retried request, UI double-click)
/// cannot create a second note. A stale id on a card that is *not* in the
/// `added` state is not trusted; the card goes through a normal publish.
pub fn publish_card<P: Publisher>(publisher: &P, card: &mut Card) -> Result<u64, AnkiflowError> {
    if card.status == CardStatus::Added {
        if let Some(id) = card.anki_id {
            return Ok(id);
        }
    }

    if !is_publishable(card) {
        return Err(AnkiflowError::AnkiRejected(
            "card has a blank front or back and cannot be published".to_string(),
        ));
    }

    let id = publisher.add_note(&card.to_anki_note())?;
    card.mark_added(id, Utc::now());
    Ok(id)
}

#[cfg(test)]
mod tests {
    use std::cell::{
        Cell,
        RefCell,
    };

    use super::*;

    /// Scripted publisher: hands out queued results and counts calls.
    pub struct FakePublisher {
        pub calls: Cell<usize>,
        results: RefCell<Vec<Result<u64, AnkiflowError>>>,
    }

    impl FakePublisher {
        pub fn returning(results: Vec<Result<u64, AnkiflowError>>) -> Self {
            FakePublisher { calls: Cell::new(0), results: RefCell::new(results) }
        }
    }

    impl Publisher for FakePublisher {
        fn add_note(&self, _note: &NotePayload) -> Result<u64, AnkiflowError> {
            self.calls.set(self.calls.get() + 1);
            self.results.borrow_mut().remove(0)
        }
    }

    #[test]
    fn publish_marks_card_added() {
        let publisher = FakePublisher::returning(vec![Ok(555)]);
        let mut card = Card::new("Q?", "A");

        let id = publish_card(&publisher, &mut card).unwrap();
        assert_eq!(id, 555);
        assert_eq!(card.status, CardStatus::Added);
        assert_eq!(card.anki_id, Some(555));
        assert!(card.added_at.is_some());
    }

    #[test]
    fn double_approve_skips_the_network() {
        let publisher = FakePublisher::returning(vec![Ok(555)]);
        let mut card = Card::new("Q?", "A");

        let first = publish_card(&publisher, &mut card).unwrap();
        let second = publish_card(&publisher, &mut card).unwrap();

        assert_eq!(first, second);
        assert_eq!(publisher.calls.get(), 1);
    }

    #[test]
    fn stale_id_on_pending_card_is_not_trusted() {
        // A stored id alone is not proof the note exists; only
        // status == added makes it authoritative.
        let publisher = FakePublisher::returning(vec![Ok(777)]);
        let mut card = Card::new("Q?", "A");
        card.anki_id = Some(123);

        let id = publish_card(&publisher, &mut card).unwrap();
        assert_eq!(id, 777);
        assert_eq!(publisher.calls.get(), 1);
    }

    #[test]
    fn blank_card_is_rejected_without_a_call() {
        let publisher = FakePublisher::returning(vec![Ok(1)]);
        let mut card = Card::new("   ", "A");

        let err = publish_card(&publisher, &mut card).unwrap_err();
        assert!(matches!(err, AnkiflowError::AnkiRejected(_)));
        assert_eq!(publisher.calls.get(), 0);
        assert_eq!(card.status, CardStatus::Pending);
    }

    #[test]
    fn publish_failure_leaves_card_pending() {
        let publisher = FakePublisher::returning(vec![Err(AnkiflowError::AnkiUnavailable(
            "connection refused".to_string(),
        ))]);
        let mut card = Card::new("Q?", "A");

        assert!(publish_card(&publisher, &mut card).is_err());
        assert_eq!(card.status, CardStatus::Pending);
        assert!(card.anki_id.is_none());
    }
}
