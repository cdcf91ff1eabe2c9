use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "butler")]
#[command(about = "Keep track of rooms and types in a table store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to $BUTLER_HOME, then the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage rooms
    #[command(alias = "r")]
    Rooms {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Manage types
    #[command(alias = "t")]
    Types {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum ItemAction {
    /// List items
    #[command(alias = "ls")]
    List(ListArgs),

    /// Add an item
    #[command(alias = "n")]
    Add {
        name: String,

        #[arg(default_value = "")]
        note: String,
    },

    /// Show one item
    #[command(alias = "v")]
    Get { row_key: String },

    /// Replace the name and note of an item
    #[command(alias = "e")]
    Update {
        row_key: String,

        name: String,

        #[arg(default_value = "")]
        note: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only items whose name contains this text
    #[arg(long)]
    pub name: Option<String>,

    /// Only items whose note contains this text
    #[arg(long)]
    pub note: Option<String>,

    /// Extra condition, `field=value` (exact) or `field~value` (contains).
    /// Fields: RowKey, name, note. Repeatable.
    #[arg(long = "where", value_name = "COND")]
    pub conditions: Vec<String>,
}
