mod document;
mod error;
mod pack;
mod parser;
mod record;
mod settings;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pack::PackWriter;
use parser::locate::locate_tables;
use parser::normalize::Normalizer;
use parser::row::RawRow;
use settings::Settings;

// Header column in `scan` output; longer header lists are cut.
const HEADER_WIDTH: usize = 56;

#[derive(Parser)]
#[command(name = "weapon_import", about = "Build weapon items for the SR6 pack from the rulebook's gear tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract weapons and write one JSON file per weapon
    Import {
        #[command(flatten)]
        source: SourceArgs,
        /// Output directory (default: packs/_source/weapons)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Book label used in each item's source citation
        #[arg(long)]
        rulebook: Option<String>,
        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show the tables found on each page without writing anything
    Scan {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the filename a weapon name is written to
    Slug {
        name: String,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Rulebook PDF, or a .json table dump
    #[arg(short, long)]
    source: Option<PathBuf>,
    /// First page to scan (1-based, inclusive)
    #[arg(long)]
    first: Option<u32>,
    /// Last page to scan (inclusive)
    #[arg(long)]
    last: Option<u32>,
    /// Settings file (default: ./weapons.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SourceArgs {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings =
            Settings::load(self.config.as_deref()).context("Failed to load settings")?;
        if let Some(source) = &self.source {
            settings.source = source.clone();
        }
        if let Some(first) = self.first {
            settings.first_page = first;
        }
        if let Some(last) = self.last {
            settings.last_page = last;
        }
        Ok(settings)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            source,
            out,
            rulebook,
            quiet,
        } => {
            let mut settings = source.settings()?;
            if let Some(out) = out {
                settings.output_dir = out;
            }
            if let Some(rulebook) = rulebook {
                settings.rulebook = rulebook;
            }
            import(&settings, quiet)
        }
        Commands::Scan { source } => scan(&source.settings()?),
        Commands::Slug { name } => {
            match pack::slug_file_name(&name) {
                Some(file) => println!("{}", file),
                None => println!("<_id>.json (no slug-safe characters, named after the record id)"),
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn import(settings: &Settings, quiet: bool) -> anyhow::Result<()> {
    let pages = settings.pages()?;
    let doc = document::open(&settings.source)
        .with_context(|| format!("Cannot open {}", settings.source.display()))?;
    info!("Document opened. Total pages: {}", doc.page_count());

    let writer = PackWriter::create(&settings.output_dir)?;
    let mut normalizer = Normalizer::new(settings.rulebook.clone(), settings.record_meta());

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(u64::from(pages.end() - pages.start() + 1));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages {msg}")?
                .progress_chars("=> "),
        );
        pb
    };

    let stats = parser::run(doc.as_ref(), pages, &mut normalizer, &pb, |record| {
        let path = writer.write(&record)?;
        info!(
            "Created: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        Ok(())
    });
    pb.finish_and_clear();

    let stats = stats.context("Error processing document")?;
    println!(
        "Created {} weapon files in {} ({} pages scanned, {} tables, {} rows, {} skipped)",
        stats.records,
        writer.dir().display(),
        stats.pages_scanned,
        stats.tables,
        stats.rows,
        stats.skipped(),
    );
    Ok(())
}

fn scan(settings: &Settings) -> anyhow::Result<()> {
    let pages = settings.pages()?;
    let doc = document::open(&settings.source)
        .with_context(|| format!("Cannot open {}", settings.source.display()))?;
    let mut normalizer = Normalizer::new(settings.rulebook.clone(), settings.record_meta());

    let mut locator = locate_tables(doc.as_ref(), pages);
    let mut summary = Vec::new();
    while let Some(table) = locator.next() {
        let table = table?;
        let weapons = table
            .rows
            .iter()
            .filter_map(|cells| RawRow::from_cells(&table.headers, cells))
            .filter(|row| normalizer.normalize(row, table.page).is_some())
            .count();
        summary.push((table.page, table.rows.len(), weapons, table.headers.join(" | ")));
    }

    if summary.is_empty() {
        println!(
            "No tables found on pages {}..={}.",
            settings.first_page, settings.last_page
        );
        return Ok(());
    }

    println!("{:>5} | {:>5} | {:>7} | {}", "Page", "Rows", "Weapons", "Headers");
    println!("{}", "-".repeat(80));
    for (page, rows, weapons, headers) in &summary {
        println!(
            "{:>5} | {:>5} | {:>7} | {:.HEADER_WIDTH$}",
            page,
            rows,
            weapons,
            headers.replace('\n', " ")
        );
    }

    let rows: usize = summary.iter().map(|s| s.1).sum();
    let weapons: usize = summary.iter().map(|s| s.2).sum();
    println!(
        "\n{} tables on {} pages scanned: {} weapons, {} rows would be skipped",
        summary.len(),
        locator.scanned(),
        weapons,
        rows - weapons
    );
    Ok(())
}

fn format_duration(d: Duration) -> String {
    match d.as_secs() {
        s if s < 60 => format!("{:.1}s", d.as_secs_f64()),
        s => format!("{}m {}s", s / 60, s % 60),
    }
}
