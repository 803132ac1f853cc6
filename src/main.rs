mod args;

use anyhow::{Context, Result};
use args::{Cli, Commands};
use br_formatter::{
    load_records, load_rows, save_record, setup_database, Direction, Record, Settings,
};
use clap::Parser;
use rusqlite::Connection;
use std::path::Path;
use tracing::{info, Level};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Present { table, input } => run_convert(&settings, &table, &input, Direction::TowardPresentation),
        Commands::Store { table, input } => run_convert(&settings, &table, &input, Direction::TowardStorage),
        Commands::Save { table, input } => run_save(&settings, &table, &input),
        Commands::Show { table } => run_show(&settings, &table),
    }
}

fn run_convert(settings: &Settings, table: &str, input: &Path, direction: Direction) -> Result<()> {
    let dispatcher = settings.dispatcher(table)?;
    let rows = load_rows(input)?;
    info!("Loaded {} rows from {}", rows.len(), input.display());

    let mut output = Vec::with_capacity(rows.len());

    for row in rows {
        let mut record = match direction {
            Direction::TowardPresentation => Record::from_storage(row),
            // Input typed by a user: every field is pending
            Direction::TowardStorage => Record::from_changes(row),
        };
        dispatcher.format_record(&mut record, direction);
        output.push(record.to_json());
    }

    print_json(&serde_json::Value::Array(output))
}

fn run_save(settings: &Settings, table: &str, input: &Path) -> Result<()> {
    let dispatcher = settings.dispatcher(table)?;
    let rows = load_rows(input)?;
    let conn = open_database(&settings.database)?;

    for row in rows {
        let mut record = Record::from_changes(row);
        let id = save_record(&conn, &dispatcher, table, None, &mut record)?;
        println!("{}", id);
    }

    Ok(())
}

fn run_show(settings: &Settings, table: &str) -> Result<()> {
    let dispatcher = settings.dispatcher(table)?;
    let conn = open_database(&settings.database)?;

    let output = load_records(&conn, &dispatcher, table)?
        .into_iter()
        .map(|stored| {
            let mut document = stored.record.to_json();
            if let serde_json::Value::Object(map) = &mut document {
                map.insert("id".to_string(), serde_json::Value::String(stored.id));
            }
            document
        })
        .collect();

    print_json(&serde_json::Value::Array(output))
}

fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", rendered);
    Ok(())
}
