//! End-to-end review flow against a real file on disk, with a scripted
//! publisher standing in for AnkiConnect.

use std::{
    cell::RefCell,
    fs,
    path::PathBuf,
};

use ankiflow::{
    anki::Publisher,
    core::{
        load_cards,
        save_cards,
        AnkiflowError,
        Card,
        CardStatus,
        NotePayload,
        ValidationWarning,
    },
    review::{
        Decision,
        Reviewer,
        ReviewSession,
    },
};
use tempfile::tempdir;

struct QueuePublisher {
    ids: RefCell<Vec<u64>>,
}

impl Publisher for QueuePublisher {
    fn add_note(&self, _note: &NotePayload) -> Result<u64, AnkiflowError> {
        Ok(self.ids.borrow_mut().remove(0))
    }
}

struct Script {
    decisions: Vec<Decision>,
    visited: Vec<String>,
}

impl Reviewer for Script {
    fn decide(
        &mut self,
        card: &Card,
        _position: usize,
        _pending_total: usize,
        _warnings: &[ValidationWarning],
    ) -> Decision {
        self.visited.push(card.front.clone());
        self.decisions.remove(0)
    }

    fn confirm_edited(&mut self, _card: &Card) -> bool {
        true
    }
}

fn three_card_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("cards.json");
    let cards = vec![
        Card::new("card 0?", "answer 0"),
        Card::new("card 1?", "answer 1"),
        Card::new("card 2?", "answer 2"),
    ];
    save_cards(&cards, &path).unwrap();
    path
}

#[test]
fn interrupted_review_resumes_where_it_left_off() {
    let dir = tempdir().unwrap();
    let path = three_card_file(&dir);
    let publisher = QueuePublisher { ids: RefCell::new(vec![555, 777]) };

    // First run: approve card 0, skip card 1, quit before card 2.
    let mut session = ReviewSession::open(&path, &publisher, None).unwrap();
    let mut script = Script {
        decisions: vec![Decision::Approve, Decision::Skip, Decision::Quit],
        visited: Vec::new(),
    };
    let summary = session.run(&mut script).unwrap();
    assert!(summary.quit);

    // Every decided transition survived in the file.
    let saved = load_cards(&path).unwrap();
    assert_eq!(saved[0].status, CardStatus::Added);
    assert_eq!(saved[0].anki_id, Some(555));
    assert!(saved[0].added_at.is_some());
    assert_eq!(saved[1].status, CardStatus::Skipped);
    assert_eq!(saved[2].status, CardStatus::Pending);

    // Second run: only card 2 is presented.
    let mut session = ReviewSession::open(&path, &publisher, None).unwrap();
    let mut script = Script { decisions: vec![Decision::Approve], visited: Vec::new() };
    let summary = session.run(&mut script).unwrap();

    assert_eq!(script.visited, vec!["card 2?"]);
    assert_eq!(summary.session_added, 1);
    assert_eq!(summary.total_added, 2);
    assert_eq!(summary.total_skipped, 1);
    assert_eq!(summary.total_pending, 0);

    let saved = load_cards(&path).unwrap();
    assert_eq!(saved[2].anki_id, Some(777));
}

#[test]
fn persisted_file_stays_loadable_and_diff_friendly() {
    let dir = tempdir().unwrap();
    let path = three_card_file(&dir);
    let publisher = QueuePublisher { ids: RefCell::new(vec![1]) };

    let mut session = ReviewSession::open(&path, &publisher, None).unwrap();
    let mut script =
        Script { decisions: vec![Decision::Approve, Decision::Quit], visited: Vec::new() };
    session.run(&mut script).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"status\": \"added\""));
    assert!(raw.contains("\"status\": \"pending\""));

    // The rewritten file round-trips.
    let reloaded = load_cards(&path).unwrap();
    assert_eq!(reloaded.len(), 3);
}
