use std::{
    io::{
        self,
        Write,
    },
    path::Path,
};

use crate::{
    anki::{
        lifecycle,
        publish_card,
        AnkiClient,
    },
    core::{
        load_cards,
        validate_card,
        AnkiflowError,
        Card,
        CardStatus,
        ValidationWarning,
    },
    review::{
        CardEdit,
        Decision,
        Reviewer,
        ReviewSession,
        SessionSummary,
    },
};

pub mod args;
pub mod output;

use args::Commands;
use output::{
    print_card,
    print_error,
    print_info,
    print_success,
    print_validation_warnings,
    print_warning,
};

pub fn run(command: Commands) -> Result<(), AnkiflowError> {
    match command {
        Commands::Ping => ping(),
        Commands::Decks => list_decks(),
        Commands::Models => list_models(),
        Commands::Review { file, deck, show_warnings, reset } => {
            review(&file, deck, show_warnings, reset)
        }
        Commands::Add { file, deck } => add_batch(&file, deck),
        Commands::Quick { front, back, deck, tags, context, show_warnings } => {
            quick(front, back, deck, &tags, context, show_warnings)
        }
        Commands::Find { query } => find(&query),
        Commands::Delete { note_ids, yes } => delete(&note_ids, yes),
    }
}

fn ping() -> Result<(), AnkiflowError> {
    let client = AnkiClient::new()?;
    if client.ping() {
        print_success("✓ Connected to Anki successfully!");
        print_info(&format!("  AnkiConnect URL: {}", client.url()));
        Ok(())
    } else {
        Err(AnkiflowError::AnkiUnavailable(format!(
            "no response from {}. Make sure Anki is running with AnkiConnect installed.",
            client.url()
        )))
    }
}

fn list_decks() -> Result<(), AnkiflowError> {
    let client = AnkiClient::new()?;
    let mut decks = client.deck_names()?;
    decks.sort();
    print_success(&format!("Found {} decks:", decks.len()));
    for deck in decks {
        println!("  • {deck}");
    }
    Ok(())
}

fn list_models() -> Result<(), AnkiflowError> {
    let client = AnkiClient::new()?;
    let mut models = client.model_names()?;
    models.sort();
    print_success(&format!("Found {} note types:", models.len()));
    for model in models {
        println!("  • {model}");
    }
    Ok(())
}

fn review(
    file: &Path,
    deck: Option<String>,
    show_warnings: bool,
    reset: bool,
) -> Result<(), AnkiflowError> {
    let client = AnkiClient::new()?;
    lifecycle::ensure_running(&client)?;

    let mut session = ReviewSession::open(file, &client, deck)?;

    if session.cards().is_empty() {
        print_warning("No cards found in file.");
        return Ok(());
    }

    if reset {
        session.reset()?;
        print_info("Reset all cards to pending status.");
    }

    let pending = session.pending_indices();
    let total = session.cards().len();

    if pending.is_empty() {
        print_success("All cards have been reviewed!");
        print_status_counts(session.cards());
        println!("\nUse --reset to review all cards again.");
        return Ok(());
    }

    let already_reviewed = total - pending.len();
    if already_reviewed > 0 {
        print_info(&format!("Resuming review: {already_reviewed} cards already processed"));
        print_status_counts(session.cards());
        println!();
    }

    print_info(&format!("Reviewing {} pending cards", pending.len()));
    print_success("✓ Connected to Anki\n");

    let mut reviewer = StdinReviewer { show_warnings };
    let summary = session.run(&mut reviewer)?;
    print_summary(&summary);
    Ok(())
}

fn print_status_counts(cards: &[Card]) {
    let added = cards.iter().filter(|c| c.status == CardStatus::Added).count();
    let skipped = cards.iter().filter(|c| c.status == CardStatus::Skipped).count();
    println!("  Added: {added}, Skipped: {skipped}");
}

fn print_summary(summary: &SessionSummary) {
    println!("\n{}", "=".repeat(60));
    if summary.quit {
        print_info("Stopped reviewing. Progress has been saved.");
    }
    print_success("Review session complete!");
    println!(
        "  This session - Added: {}, Skipped: {}, Failed: {}",
        summary.session_added, summary.session_skipped, summary.session_failed
    );
    println!(
        "  Total progress - Added: {}, Skipped: {}, Pending: {}",
        summary.total_added, summary.total_skipped, summary.total_pending
    );
}

fn add_batch(file: &Path, deck: Option<String>) -> Result<(), AnkiflowError> {
    let client = AnkiClient::new()?;
    lifecycle::ensure_running(&client)?;

    let mut cards = load_cards(file)?;
    if cards.is_empty() {
        print_warning("No cards found in file.");
        return Ok(());
    }

    if let Some(deck) = deck {
        for card in &mut cards {
            card.deck = deck.clone();
        }
    }

    print_info(&format!("Adding {} cards to Anki...", cards.len()));

    let notes: Vec<_> = cards.iter().map(Card::to_anki_note).collect();
    let note_ids = client.add_notes(&notes)?;
    let added = note_ids.iter().filter(|id| id.is_some()).count();
    let failed = note_ids.len() - added;

    print_success(&format!("✓ Successfully added {added} cards"));
    if failed > 0 {
        print_warning(&format!("  Failed to add {failed} cards (duplicates?)"));
    }
    Ok(())
}

fn quick(
    front: String,
    back: String,
    deck: String,
    tags: &str,
    context: String,
    show_warnings: bool,
) -> Result<(), AnkiflowError> {
    let client = AnkiClient::new()?;
    lifecycle::ensure_running(&client)?;

    let mut card = Card::new(front, back);
    card.deck = deck;
    card.context = context;
    card.tags = parse_tags(tags);

    let warnings = validate_card(&card);
    if show_warnings && !warnings.is_empty() {
        print_warning("Validation warnings:");
        print_validation_warnings(&warnings);
        println!();
    }

    let id = publish_card(&client, &mut card)?;
    print_success(&format!("✓ Card added to Anki (ID: {id})"));
    Ok(())
}

fn find(query: &str) -> Result<(), AnkiflowError> {
    let client = AnkiClient::new()?;
    let note_ids = client.find_notes(query)?;

    if note_ids.is_empty() {
        print_warning("No notes found.");
        return Ok(());
    }
    print_success(&format!("Found {} notes:", note_ids.len()));

    let shown: Vec<u64> = note_ids.iter().copied().take(20).collect();
    for note in client.notes_info(&shown)? {
        println!("\n  ID: {}", note.note_id);
        let tags = if note.tags.is_empty() { "(none)".to_string() } else { note.tags.join(", ") };
        println!("  Tags: {tags}");

        // First field only, usually the front.
        if let Some((name, field)) = note.fields.iter().min_by_key(|(_, f)| f.order) {
            let mut content = field.value.replace("<br>", " ");
            if content.len() > 80 {
                content = format!("{}...", truncate_chars(&content, 80));
            }
            println!("  {name}: {content}");
        }
    }

    if note_ids.len() > 20 {
        print_info(&format!("\n(Showing first 20 of {} results)", note_ids.len()));
    }
    Ok(())
}

fn delete(note_ids: &[u64], yes: bool) -> Result<(), AnkiflowError> {
    if !yes {
        let answer = prompt(&format!("Delete {} note(s)? [y/N] ", note_ids.len()))?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            print_info("Aborted.");
            return Ok(());
        }
    }

    let client = AnkiClient::new()?;
    client.delete_notes(note_ids)?;
    print_success(&format!("✓ Deleted {} note(s)", note_ids.len()));
    Ok(())
}

fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn prompt(message: &str) -> Result<String, AnkiflowError> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Interactive reviewer over stdin. Pressing Enter keeps the shown default.
struct StdinReviewer {
    show_warnings: bool,
}

impl StdinReviewer {
    fn prompt_decision(&self) -> Decision {
        loop {
            let answer = match prompt("Action [a/e/s/q] (a): ") {
                Ok(answer) => answer,
                Err(_) => return Decision::Quit,
            };
            match answer.trim().to_lowercase().as_str() {
                "" | "a" => return Decision::Approve,
                "s" => return Decision::Skip,
                "q" => return Decision::Quit,
                "e" => return Decision::Edit(self.prompt_edit()),
                other => println!("Unknown action '{other}'. Use a, e, s, or q."),
            }
        }
    }

    fn prompt_edit(&self) -> CardEdit {
        println!("\nEdit card (press Enter to keep current value):");
        CardEdit {
            front: prompt_optional("Front: "),
            back: prompt_optional("Back: "),
            context: prompt_optional("Context: "),
            tags: prompt_optional("Tags (comma-separated): ").map(|t| parse_tags(&t)),
        }
    }
}

fn prompt_optional(message: &str) -> Option<String> {
    match prompt(message) {
        Ok(answer) if !answer.is_empty() => Some(answer),
        _ => None,
    }
}

impl Reviewer for StdinReviewer {
    fn decide(
        &mut self,
        card: &Card,
        position: usize,
        pending_total: usize,
        warnings: &[ValidationWarning],
    ) -> Decision {
        print_card(card, position, pending_total);
        if self.show_warnings {
            print_validation_warnings(warnings);
        }
        println!();
        self.prompt_decision()
    }

    fn confirm_edited(&mut self, _card: &Card) -> bool {
        match prompt("\nApprove edited card? [Y/n] ") {
            Ok(answer) => !answer.trim().eq_ignore_ascii_case("n"),
            Err(_) => false,
        }
    }

    fn on_published(&mut self, _card: &Card, id: u64) {
        print_success(&format!("✓ Card added to Anki (ID: {id})"));
    }

    fn on_skipped(&mut self, _card: &Card) {
        print_warning("Skipped card.");
    }

    fn on_publish_failed(&mut self, _card: &Card, error: &AnkiflowError) {
        print_error(&format!("Failed to add card: {error}"));
        if error.is_retryable() {
            print_info("  The card stays pending; retry once Anki is reachable.");
        }
    }
}
