use std::path::{
    Path,
    PathBuf,
};

use crate::{
    anki::{
        publish_card,
        Publisher,
    },
    core::{
        load_cards,
        save_cards,
        validate_card,
        AnkiflowError,
        Card,
        CardStatus,
        ValidationWarning,
    },
};

/// Replacement values from an edit. Unset fields keep their prior value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardEdit {
    pub front: Option<String>,
    pub back: Option<String>,
    pub context: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CardEdit {
    pub fn apply(&self, card: &mut Card) {
        if let Some(front) = &self.front {
            card.front = front.clone();
        }
        if let Some(back) = &self.back {
            card.back = back.clone();
        }
        if let Some(context) = &self.context {
            card.context = context.clone();
        }
        if let Some(tags) = &self.tags {
            card.tags = tags.clone();
        }
    }
}

/// One decision on the card currently being presented.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Approve,
    Skip,
    Edit(CardEdit),
    Quit,
}

/// Drives the decisions of a review run. Implemented over stdin by the CLI
/// and by scripted reviewers in tests.
pub trait Reviewer {
    /// Presents the card (with its validation warnings and its position
    /// among the pending cards) and returns one decision.
    fn decide(
        &mut self,
        card: &Card,
        position: usize,
        pending_total: usize,
        warnings: &[ValidationWarning],
    ) -> Decision;

    /// Called after an edit; `true` approves the edited card, `false` skips
    /// it.
    fn confirm_edited(&mut self, card: &Card) -> bool;

    // The session reports every outcome before advancing, so the reviewer
    // always knows whether an action took effect.
    fn on_published(&mut self, _card: &Card, _id: u64) {}
    fn on_skipped(&mut self, _card: &Card) {}
    fn on_publish_failed(&mut self, _card: &Card, _error: &AnkiflowError) {}
}

/// Counts for one run plus the collection totals after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub session_added: usize,
    pub session_skipped: usize,
    pub session_failed: usize,
    pub total_added: usize,
    pub total_skipped: usize,
    pub total_pending: usize,
    pub quit: bool,
}

/// A resumable walk over the pending cards of one collection file.
///
/// Every status transition is written back to the file before the next card
/// is presented, so an interrupt or crash loses at most the decision in
/// flight. Re-opening the same file resumes at the first still-pending card.
/// There is no locking; two sessions on one file race (last writer wins).
pub struct ReviewSession<'a, P: Publisher> {
    path: PathBuf,
    cards: Vec<Card>,
    publisher: &'a P,
    deck_override: Option<String>,
}

impl<'a, P: Publisher> ReviewSession<'a, P> {
    pub fn open(
        path: &Path,
        publisher: &'a P,
        deck_override: Option<String>,
    ) -> Result<Self, AnkiflowError> {
        let cards = load_cards(path)?;
        Ok(ReviewSession { path: path.to_path_buf(), cards, publisher, deck_override })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Indices still awaiting a decision, in collection order.
    pub fn pending_indices(&self) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_pending())
            .map(|(i, _)| i)
            .collect()
    }

    /// Forces every card back to `pending` and persists the rewrite.
    pub fn reset(&mut self) -> Result<(), AnkiflowError> {
        for card in &mut self.cards {
            card.reset();
        }
        self.persist()
    }

    /// Runs the decision loop until the pending cards are exhausted or the
    /// reviewer quits. A publish failure is reported and the card stays
    /// pending; the loop moves on.
    pub fn run(&mut self, reviewer: &mut dyn Reviewer) -> Result<SessionSummary, AnkiflowError> {
        let pending = self.pending_indices();
        let mut summary = SessionSummary::default();

        for (position, &idx) in pending.iter().enumerate() {
            if let Some(deck) = &self.deck_override {
                self.cards[idx].deck = deck.clone();
            }

            let warnings = validate_card(&self.cards[idx]);
            let decision =
                reviewer.decide(&self.cards[idx], position + 1, pending.len(), &warnings);

            let approve = match decision {
                Decision::Quit => {
                    summary.quit = true;
                    break;
                }
                Decision::Approve => true,
                Decision::Skip => false,
                Decision::Edit(edit) => {
                    edit.apply(&mut self.cards[idx]);
                    reviewer.confirm_edited(&self.cards[idx])
                }
            };

            if approve {
                match publish_card(self.publisher, &mut self.cards[idx]) {
                    Ok(id) => {
                        self.persist()?;
                        reviewer.on_published(&self.cards[idx], id);
                        summary.session_added += 1;
                    }
                    Err(error) => {
                        // Status untouched, so the card is retried on the
                        // next run.
                        reviewer.on_publish_failed(&self.cards[idx], &error);
                        summary.session_failed += 1;
                    }
                }
            } else {
                self.cards[idx].status = CardStatus::Skipped;
                self.persist()?;
                reviewer.on_skipped(&self.cards[idx]);
                summary.session_skipped += 1;
            }
        }

        self.fill_totals(&mut summary);
        Ok(summary)
    }

    fn persist(&self) -> Result<(), AnkiflowError> {
        save_cards(&self.cards, &self.path)
    }

    fn fill_totals(&self, summary: &mut SessionSummary) {
        for card in &self.cards {
            match card.status {
                CardStatus::Added => summary.total_added += 1,
                CardStatus::Skipped => summary.total_skipped += 1,
                CardStatus::Pending => summary.total_pending += 1,
            }
        }
    }
}

/// One mutation addressed at a collection index. The seam shared by the CLI
/// reviewer and the web backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CardAction {
    Approve,
    Skip,
    Edit(CardEdit),
    Reset,
}

/// Loads a collection together with per-card validation warnings, in review
/// order.
pub fn load_for_review(
    path: &Path,
) -> Result<Vec<(Card, Vec<ValidationWarning>)>, AnkiflowError> {
    let cards = load_cards(path)?;
    Ok(cards
        .into_iter()
        .map(|card| {
            let warnings = validate_card(&card);
            (card, warnings)
        })
        .collect())
}

/// Applies one action to the card at `index` and returns the updated card.
///
/// The bounds check runs before any mutation, and a failed approve leaves
/// the file untouched. `Reset` rewrites the whole collection to `pending`
/// (the index only selects which card to return).
pub fn apply_action<P: Publisher>(
    path: &Path,
    index: usize,
    action: CardAction,
    publisher: &P,
) -> Result<Card, AnkiflowError> {
    let mut cards = load_cards(path)?;
    if index >= cards.len() {
        return Err(AnkiflowError::IndexOutOfRange { index, len: cards.len() });
    }

    match action {
        CardAction::Approve => {
            publish_card(publisher, &mut cards[index])?;
            save_cards(&cards, path)?;
        }
        CardAction::Skip => {
            cards[index].status = CardStatus::Skipped;
            save_cards(&cards, path)?;
        }
        CardAction::Edit(edit) => {
            edit.apply(&mut cards[index]);
            save_cards(&cards, path)?;
        }
        CardAction::Reset => {
            for card in &mut cards {
                card.reset();
            }
            save_cards(&cards, path)?;
        }
    }

    Ok(cards[index].clone())
}

/// Forces every card in the file back to `pending`, returning the rewritten
/// collection. Works on empty collections too.
pub fn reset_collection(path: &Path) -> Result<Vec<Card>, AnkiflowError> {
    let mut cards = load_cards(path)?;
    for card in &mut cards {
        card.reset();
    }
    save_cards(&cards, path)?;
    Ok(cards)
}
