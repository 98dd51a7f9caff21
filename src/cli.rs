use std::num::NonZeroUsize;

use clap::{Parser, Subcommand};

use notees::core::NoteColor;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "notees", version)]
#[command(about = "Text and checklist notes from the command line", long_about = None)]
#[command(after_help = "IDs may be shortened to any unique prefix.")]
pub struct Invocation {
    /// Log at debug level to the journal
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Invocation {
    /// The requested command, `list` when none was given.
    pub fn command_or_list(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::List { query: Vec::new() })
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List notes, optionally filtered
    List { query: Vec<String> },
    /// List favorite notes
    Favorites { query: Vec<String> },
    /// Create a text note
    New {
        title: String,
        content: Vec<String>,
    },
    /// Create a checklist note
    Checklist {
        title: String,
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Print a note
    Show { id: String },
    /// Add to or remove from favorites
    Star { id: String },
    /// Recolor a note
    Color {
        id: String,
        #[arg(value_parser = clap::value_parser!(NoteColor))]
        color: NoteColor,
    },
    /// Toggle the N-th checklist item
    Check { id: String, index: NonZeroUsize },
    /// Delete a note
    #[command(name = "rm")]
    Remove {
        id: String,
        /// Delete without asking
        #[arg(short, long)]
        yes: bool,
    },
}
