//! pdfxml - structured XML from extracted PDF text
//!
//! A CLI tool that turns PDF extraction output into XML documents of pages,
//! headers, paragraphs and lists.

#![deny(unsafe_code)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, TextInputArgs};
use pdfxml::config::ConverterConfig;
use pdfxml::conversion::{ConversionStatus, InMemoryStore};
use pdfxml::extraction::{PayloadExtractor, TextExtractor};
use pdfxml::pipeline::{self, PipelineOptions};
use pdfxml::{assemble_extracted, Document, MetadataInput, Section, SectionKind, XmlLayout};
use std::path::{Path, PathBuf};

/// Main entry point for the pdfxml CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let config = ConverterConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;

    match cli.command {
        Commands::Convert {
            inputs,
            output,
            format,
            indent,
            text,
        } => {
            handle_convert_command(&config, inputs, output, format, indent, &text, cli.verbose)?;
        }

        Commands::Inspect { input, text } => {
            handle_inspect_command(&config, &input, &text)?;
        }
    }

    Ok(())
}

/// Handle the convert command
fn handle_convert_command(
    config: &ConverterConfig,
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: Option<pdfxml::config::OutputFormat>,
    indent: bool,
    text: &TextInputArgs,
    verbose: bool,
) -> Result<()> {
    // Command-line flags take precedence over pdfxml.toml
    let options = PipelineOptions {
        format: format.unwrap_or(config.output.format),
        layout: if indent {
            XmlLayout::Indented
        } else {
            config.output.layout
        },
        output_dir: output.or_else(|| config.output.directory.clone()),
    };

    let extractor = build_extractor(config, text);

    println!("[Stage 1/3] Discovering inputs...");
    let files = pipeline::discover_inputs(&inputs).context("Failed to discover inputs")?;
    println!("✓ Found {} input files", files.len());

    println!("\n[Stage 2/3] Converting...");
    let store = InMemoryStore::new();
    let outcomes =
        pipeline::run(&files, &store, &extractor, &options).context("Conversion run failed")?;

    println!("\n[Stage 3/3] Results:");
    let mut failures = 0;
    for outcome in &outcomes {
        match (&outcome.output, &outcome.error) {
            (Some(path), _) => {
                let (pages, sections) = outcome.summary.unwrap_or_default();
                println!(
                    "  ✓ {} -> {} ({} pages, {} sections)",
                    outcome.input.display(),
                    path.display(),
                    pages,
                    sections
                );
            }
            (None, error) => {
                failures += 1;
                println!(
                    "  ✗ {} [{}]: {}",
                    outcome.input.display(),
                    outcome.status,
                    error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        if verbose {
            println!("    conversion id: {}", outcome.conversion_id);
        }
    }

    let completed = outcomes
        .iter()
        .filter(|o| o.status == ConversionStatus::Completed && o.output.is_some())
        .count();
    println!("\n{} of {} conversions written", completed, outcomes.len());

    if failures > 0 {
        anyhow::bail!("{} of {} conversions failed", failures, outcomes.len());
    }

    Ok(())
}

/// Handle the inspect command
fn handle_inspect_command(
    config: &ConverterConfig,
    input: &Path,
    text: &TextInputArgs,
) -> Result<()> {
    let extractor = build_extractor(config, text);
    let extracted = extractor
        .extract(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let doc = assemble_extracted(&extracted)
        .with_context(|| format!("Failed to assemble {}", input.display()))?;

    print_document_summary(&doc);
    Ok(())
}

/// Build the payload extractor from configuration and plain text arguments
fn build_extractor(config: &ConverterConfig, text: &TextInputArgs) -> PayloadExtractor {
    let metadata = MetadataInput {
        title: text.title.clone(),
        author: text.author.clone(),
        creation_date: text.creation_date.clone(),
    };
    PayloadExtractor::new(config.input.max_bytes).text_defaults(text.pages, metadata)
}

/// Print document summary
fn print_document_summary(doc: &Document) {
    println!("Title: {}", doc.metadata.title);
    println!("Author: {}", doc.metadata.author);
    if !doc.metadata.creation_date.is_empty() {
        println!("Created: {}", doc.metadata.creation_date);
    }
    println!(
        "{} pages, {} sections ({} headers, {} paragraphs, {} lists), {} words",
        doc.pages.len(),
        doc.section_count(),
        doc.count_of(SectionKind::Header),
        doc.count_of(SectionKind::Paragraph),
        doc.count_of(SectionKind::List),
        doc.word_count()
    );

    for page in &doc.pages {
        println!("\nPage {}:", page.number);
        if page.is_empty() {
            println!("  (empty)");
        }
        for section in &page.sections {
            print_section_info(section);
        }
    }
}

/// Print information about a single section
fn print_section_info(section: &Section) {
    match section {
        Section::Header { text, level } => println!("  H{} {}", level, text),
        Section::Paragraph { text } => println!("  ¶  {}", preview(text)),
        Section::List { items } => {
            println!("  •  list of {} items", items.len());
            for item in items {
                println!("     - {}", preview(item));
            }
        }
    }
}

/// Shorten long text for display
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 72;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{}…", head)
    }
}
