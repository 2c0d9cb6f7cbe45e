use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tapscan_core::TagTechnology;

#[derive(Debug, Parser)]
#[command(name = "tapscan", version, about = "Contactless card scanner demo")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one scan against a scripted reader
    Scan(ScanArgs),

    /// Manage plain notes
    Notes {
        /// SQLite database file
        #[arg(long, default_value = "tapscan.db")]
        db: String,

        #[command(subcommand)]
        action: NotesAction,
    },

    /// Exercise the secure note slot with an in-memory vault
    Secure {
        /// Text to save after unlocking
        text: String,

        /// Make authentication fail
        #[arg(long)]
        deny: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum NotesAction {
    /// List notes, newest first
    List,

    /// Add a note
    Add { text: String },

    /// Delete a note by id
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TechnologyArg {
    Felica,
    Mifare,
    Iso15693,
    IsoDep,
}

impl From<TechnologyArg> for TagTechnology {
    fn from(arg: TechnologyArg) -> Self {
        match arg {
            TechnologyArg::Felica => TagTechnology::Felica,
            TechnologyArg::Mifare => TagTechnology::Mifare,
            TechnologyArg::Iso15693 => TagTechnology::Iso15693,
            TechnologyArg::IsoDep => TagTechnology::IsoDep,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Simulate a build without a contactless module
    #[arg(long)]
    pub no_driver: bool,

    /// Simulate a device without contactless hardware
    #[arg(long)]
    pub unsupported: bool,

    /// Technology of the presented card
    #[arg(long, value_enum, default_value = "felica")]
    pub technology: TechnologyArg,

    /// Card identifier (hex)
    #[arg(long, default_value = "0123456789AB")]
    pub idm: String,

    /// FeliCa system code
    #[arg(long, default_value = "0003")]
    pub system_code: String,

    /// Present a card that negotiates but cannot be read
    #[arg(long)]
    pub unreadable: bool,

    /// Never present a card
    #[arg(long)]
    pub no_card: bool,

    /// Delay before the card is presented, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub present_after_ms: u64,

    /// Presentation timeout in seconds; 0 waits indefinitely
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
}

impl ScanArgs {
    pub fn presentation_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}
