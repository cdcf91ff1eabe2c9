use butlerbod::api::{ButlerApi, CmdMessage, CmdResult, MessageLevel};
use butlerbod::config::ButlerConfig;
use butlerbod::error::{ButlerError, Result};
use butlerbod::logging;
use butlerbod::model::{CollectionKind, Item};
use butlerbod::query::{Condition, Field, TableQuery};
use butlerbod::store::fs::FsTableStore;
use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, ItemAction, ListArgs};

const HOME_ENV: &str = "BUTLER_HOME";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir)?;
    let config = ButlerConfig::load(&data_dir)?;

    match cli.command {
        Commands::Config => handle_config(&config),
        Commands::Rooms { action } => {
            handle_action(data_dir, &config, CollectionKind::Rooms, action).await
        }
        Commands::Types { action } => {
            handle_action(data_dir, &config, CollectionKind::Types, action).await
        }
    }
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let proj_dirs = ProjectDirs::from("com", "butlerbod", "butlerbod")
        .ok_or_else(|| ButlerError::Api("Could not determine data dir".into()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

async fn handle_action(
    data_dir: PathBuf,
    config: &ButlerConfig,
    kind: CollectionKind,
    action: ItemAction,
) -> Result<()> {
    let store = Arc::new(FsTableStore::new(data_dir));
    let api = ButlerApi::open(store, config).await?;

    match action {
        ItemAction::List(args) => {
            let result = api.list(kind, &list_query(args)?).await?;
            print_listing(&result);
        }
        ItemAction::Add { name, note } => {
            let result = api.add(kind, name, note).await?;
            print_messages(&result.messages);
        }
        ItemAction::Get { row_key } => {
            let result = api.get(kind, &row_key).await?;
            print_full_items(&result.listed_items);
        }
        ItemAction::Update {
            row_key,
            name,
            note,
        } => {
            let result = api.update(kind, &row_key, name, note).await?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_config(config: &ButlerConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    println!("{}", json);
    Ok(())
}

fn list_query(args: ListArgs) -> Result<TableQuery> {
    let mut query = TableQuery::new();
    if let Some(name) = args.name {
        query = query.where_contains(Field::Name, name);
    }
    if let Some(note) = args.note {
        query = query.where_contains(Field::Note, note);
    }
    for raw in &args.conditions {
        query = query.with_condition(raw.parse::<Condition>()?);
    }
    Ok(query)
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
        }
    }
}

fn print_full_items(items: &[Item]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!("{} {}", item.row_key.yellow(), item.name.bold());
        println!("--------------------------------");
        println!("{}", item.note);
    }
}

const LINE_WIDTH: usize = 100;
const KEY_WIDTH: usize = 38;
const TIME_WIDTH: usize = 14;

fn print_listing(result: &CmdResult) {
    if let Some(title) = &result.title {
        println!("{}", title.bold());
    }
    for item in &result.listed_items {
        let name_note = if item.note.is_empty() {
            item.name.clone()
        } else {
            format!("{} {}", item.name, item.note.replace('\n', " "))
        };

        let available = LINE_WIDTH.saturating_sub(KEY_WIDTH + TIME_WIDTH);
        let display = truncate_to_width(&name_note, available);
        let padding = available.saturating_sub(display.width());

        let time_ago = item.timestamp.map(format_time_ago).unwrap_or_default();

        let key = format!("{:<width$}", item.row_key, width = KEY_WIDTH);

        println!(
            "{}{}{}{}",
            key.yellow(),
            display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
    print_messages(&result.messages);
}

/// Cuts `s` to at most `max_width` display columns. Text that fits is returned
/// unchanged; otherwise the last column goes to an ellipsis.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut cut: String = s
        .chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= budget
        })
        .collect();
    if max_width > 0 {
        cut.push('…');
    }
    cut
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
