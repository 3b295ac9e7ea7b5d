use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};

#[derive(Parser)]
#[command(name = "ankiflow", about = "Agent-assisted flashcard review and publishing for Anki")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that Anki is running with AnkiConnect
    Ping,

    /// List all available decks
    Decks,

    /// List all available note types (models)
    Models,

    /// Review cards from a JSON file one at a time before adding them.
    /// Progress is saved to the file; an interrupted review resumes from
    /// the first unreviewed card on the next run.
    Review {
        /// Card collection file (JSON array of cards)
        file: PathBuf,
        /// Override deck name for all cards
        #[arg(long)]
        deck: Option<String>,
        /// Display validation warnings during review
        #[arg(long)]
        show_warnings: bool,
        /// Reset all cards to pending and start a fresh review
        #[arg(long)]
        reset: bool,
    },

    /// Add all cards from a JSON file in one batch, without review
    Add {
        /// Card collection file (JSON array of cards)
        file: PathBuf,
        /// Override deck name for all cards
        #[arg(long)]
        deck: Option<String>,
    },

    /// Create and add a single card
    Quick {
        front: String,
        back: String,
        #[arg(long, default_value = "Default")]
        deck: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "")]
        context: String,
        /// Display validation warnings before adding
        #[arg(long)]
        show_warnings: bool,
    },

    /// Search notes with Anki query syntax (e.g. "deck:Default tag:rust")
    Find { query: String },

    /// Delete notes by their ids
    Delete {
        #[arg(required = true)]
        note_ids: Vec<u64>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
