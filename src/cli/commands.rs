use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "np",
    about = concat!("notepane v", env!("CARGO_PKG_VERSION"), " - memo, to-do list and chat in one terminal"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: $NOTEPANE_DATA_DIR or the platform data dir)
    #[arg(long = "data-dir", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List to-do items, numbered from 1 per bucket
    List(ListArgs),
    /// Add an item to immediate (or backlog)
    Add(AddArgs),
    /// Check or uncheck an item
    Toggle(ItemArgs),
    /// Replace an item's text
    Edit(EditArgs),
    /// Delete an item
    Rm(ItemArgs),
    /// Move an item to another bucket or position
    Mv(MvArgs),
    /// Work with the autosaved memo
    Memo(MemoCmd),
    /// Show where data files live
    Paths,
    /// View or clear the recovery log
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only this bucket (immediate, backlog, done)
    pub bucket: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Item text
    pub text: String,
    /// Add to backlog instead of immediate
    #[arg(long, short = 'b')]
    pub backlog: bool,
}

#[derive(Args)]
pub struct ItemArgs {
    /// Bucket holding the item
    pub bucket: String,
    /// 1-based position in the bucket
    pub index: usize,
}

#[derive(Args)]
pub struct EditArgs {
    /// Bucket holding the item
    pub bucket: String,
    /// 1-based position in the bucket
    pub index: usize,
    /// New text (blank keeps the current text)
    pub text: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Bucket holding the item
    pub bucket: String,
    /// 1-based position in the bucket
    pub index: usize,
    /// Destination bucket
    pub to: String,
    /// 1-based destination position (default: end)
    #[arg(long)]
    pub at: Option<usize>,
}

#[derive(Args)]
pub struct MemoCmd {
    #[command(subcommand)]
    pub action: MemoAction,
}

#[derive(Subcommand)]
pub enum MemoAction {
    /// Print the autosaved memo
    Show,
    /// Write the autosaved memo to a markdown file
    Export {
        /// Target path (.md is appended when there is no extension)
        path: PathBuf,
    },
    /// Load a markdown file into the autosave slot
    Import {
        /// Source .md file
        path: PathBuf,
    },
    /// Remove the autosaved memo
    Clear,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Only the newest N entries
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
    /// Delete the recovery log
    #[arg(long)]
    pub clear: bool,
}
