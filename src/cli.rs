//! Command-line interface for the scraper.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::attributes::{generate_attributes, Rarity};
use crate::error::Result;
use crate::images::{remove_originals, rename_images};
use crate::merge::merge_sets;
use crate::scrape::{run_scrape, PageSource};

/// Kanji card scraper - collect readings and card images from atwiki pages.
#[derive(Parser)]
#[command(name = "kanji-scraper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape a wiki page (or saved HTML file) into a card set directory.
    Scrape {
        /// Page URL, or path to a saved HTML file
        source: String,

        /// Set directory to write (created if missing), e.g. public/kanji/level-7
        output_dir: PathBuf,
    },

    /// Merge a scraped set into an existing set, renumbering its images.
    Merge {
        /// Directory holding the freshly scraped set
        source_dir: PathBuf,

        /// Existing set directory to merge into
        target_dir: PathBuf,
    },

    /// Rename image files to zero-padded sequential names (originals kept).
    Rename {
        /// Set directories to process
        #[arg(required = true)]
        set_dirs: Vec<PathBuf>,
    },

    /// Move reading-named image files to a backup folder, or delete them.
    RemoveOriginals {
        /// Permanently delete instead of moving to a backup folder
        #[arg(long)]
        delete: bool,

        /// Set directories to process
        #[arg(required = true)]
        set_dirs: Vec<PathBuf>,
    },

    /// Generate game attributes for each kanji in a CSV.
    Attributes {
        /// Input CSV whose first column holds the kanji
        input: PathBuf,

        /// Output CSV (default: rewrite the input in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape { source, output_dir } => scrape_command(&source, &output_dir),
        Commands::Merge {
            source_dir,
            target_dir,
        } => merge_command(&source_dir, &target_dir),
        Commands::Rename { set_dirs } => {
            for_each_set(&set_dirs, rename_command);
            Ok(())
        }
        Commands::RemoveOriginals { delete, set_dirs } => {
            for_each_set(&set_dirs, |dir| remove_originals_command(dir, delete));
            Ok(())
        }
        Commands::Attributes { input, output } => attributes_command(&input, output.as_deref()),
    }
}

/// Process each set directory, reporting failures without aborting the rest.
fn for_each_set(set_dirs: &[PathBuf], mut command: impl FnMut(&Path) -> Result<()>) {
    for dir in set_dirs {
        if let Err(e) = command(dir) {
            println!("{} {}: {e}", style("Failed").red().bold(), dir.display());
        }
    }
}

fn progress_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("  {} {warning}", style("warning:").yellow().bold());
    }
}

/// Execute the scrape command.
fn scrape_command(source: &str, output_dir: &Path) -> Result<()> {
    let source = PageSource::from_arg(source)?;

    println!(
        "{} {} into {}",
        style("Scraping").bold(),
        style(&source).cyan(),
        style(output_dir.display()).green()
    );
    println!();

    let pb = progress_spinner("Fetching page and downloading images...");
    let report = match run_scrape(&source, output_dir) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    print_warnings(&report.warnings);
    println!();
    println!(
        "{} {} rows to {}",
        style("Saved").green().bold(),
        report.rows.len(),
        report.csv_path.display()
    );

    Ok(())
}

/// Execute the merge command.
fn merge_command(source_dir: &Path, target_dir: &Path) -> Result<()> {
    let report = merge_sets(source_dir, target_dir)?;

    print_warnings(&report.warnings);
    println!(
        "{} {} rows into {}",
        style("Merged").green().bold(),
        report.merged,
        target_dir.display()
    );

    Ok(())
}

/// Execute the rename command for one set directory.
fn rename_command(set_dir: &Path) -> Result<()> {
    let report = rename_images(set_dir)?;

    println!(
        "{} {}: {} files renamed, {} skipped; backup at {}",
        style("Processed").green().bold(),
        set_dir.display(),
        report.renamed,
        report.skipped,
        report.backup.display()
    );

    Ok(())
}

/// Execute the remove-originals command for one set directory.
fn remove_originals_command(set_dir: &Path, delete: bool) -> Result<()> {
    let report = remove_originals(set_dir, delete)?;

    match report.backup_dir {
        Some(backup_dir) => println!(
            "{} {} original files from {} to {}",
            style("Moved").green().bold(),
            report.processed,
            set_dir.display(),
            backup_dir.display()
        ),
        None => println!(
            "{} {} original files in {}",
            style("Deleted").green().bold(),
            report.processed,
            set_dir.display()
        ),
    }
    if report.failed > 0 {
        println!(
            "  {} {} files could not be processed",
            style("warning:").yellow().bold(),
            report.failed
        );
    }

    Ok(())
}

/// Execute the attributes command.
fn attributes_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let output = output.unwrap_or(input);
    let report = generate_attributes(input, output)?;

    print_warnings(&report.warnings);
    println!(
        "{} attributes for {} kanji to {}",
        style("Generated").green().bold(),
        report.rows,
        output.display()
    );
    println!();
    println!("Rarity distribution:");
    for rarity in Rarity::ALL {
        let count = report.rarity_counts.get(&rarity).copied().unwrap_or(0);
        let percentage = if report.rows == 0 {
            0.0
        } else {
            count as f64 / report.rows as f64 * 100.0
        };
        println!("  {:<10} {count} ({percentage:.1}%)", rarity.as_str());
    }

    Ok(())
}
