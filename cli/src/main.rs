//! kitdoc CLI - ELISA kit datasheet extraction and rewriting tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use kitdoc::extract::{
    compile_rules, default_rules, load_rules_file, summarize_blocks, ExtractOptions,
    SectionSpec, TabulateOutcome,
};
use kitdoc::{
    parse_file_with_options, CleanupPreset, JsonFormat, ParseOptions, RenderOptions, WriteOptions,
};

#[derive(Parser)]
#[command(name = "kitdoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract sections and tables from ELISA kit datasheets (DOCX)", long_about = None)]
struct Cli {
    /// Read auxiliary parts leniently (skip unreadable styles / properties)
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List body blocks with style, heading and table information
    Inspect {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Extraction profile (JSON)
        #[arg(long, value_name = "JSON", env = "KITDOC_PROFILE")]
        profile: Option<PathBuf>,
    },

    /// Extract sections and tables as a JSON report
    Extract {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Extraction profile (JSON)
        #[arg(long, value_name = "JSON", env = "KITDOC_PROFILE")]
        profile: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Export plain text or Markdown
    Text {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Render Markdown instead of plain text
        #[arg(short, long)]
        markdown: bool,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Text cleanup preset
        #[arg(long, value_enum)]
        cleanup: Option<CleanupLevel>,
    },

    /// Apply text replacements to every run and save
    Replace {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (input is overwritten if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Replacement rules (JSON); defaults to the rebranding rules
        #[arg(long, value_name = "JSON")]
        rules: Option<PathBuf>,

        /// Do not back up the file being overwritten
        #[arg(long)]
        no_backup: bool,
    },

    /// Convert a section's pipe-delimited text into a table and save
    Tabulate {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Section heading (defaults to REAGENTS PROVIDED and its synonyms)
        #[arg(short, long, value_name = "NAME")]
        section: Option<String>,

        /// Output file (input is overwritten if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Do not back up the file being overwritten
        #[arg(long)]
        no_backup: bool,
    },

    /// Extract a report for every .docx file in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Extraction profile (JSON)
        #[arg(long, value_name = "JSON", env = "KITDOC_PROFILE")]
        profile: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Minimal cleanup (Unicode normalization only)
    Minimal,
    /// Standard cleanup
    Standard,
    /// Aggressive cleanup
    Aggressive,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
            CleanupLevel::Aggressive => CleanupPreset::Aggressive,
        }
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let parse_options = if cli.lenient {
        ParseOptions::new().lenient()
    } else {
        ParseOptions::new()
    };

    let result = match cli.command {
        Commands::Inspect { input, profile } => cmd_inspect(&input, profile.as_deref(), parse_options),
        Commands::Extract {
            input,
            output,
            profile,
            compact,
        } => cmd_extract(
            &input,
            output.as_deref(),
            profile.as_deref(),
            compact,
            parse_options,
        ),
        Commands::Text {
            input,
            output,
            markdown,
            frontmatter,
            cleanup,
        } => cmd_text(
            &input,
            output.as_deref(),
            markdown,
            frontmatter,
            cleanup,
            parse_options,
        ),
        Commands::Replace {
            input,
            output,
            rules,
            no_backup,
        } => cmd_replace(
            &input,
            output.as_deref(),
            rules.as_deref(),
            no_backup,
            parse_options,
        ),
        Commands::Tabulate {
            input,
            section,
            output,
            no_backup,
        } => cmd_tabulate(
            &input,
            section.as_deref(),
            output.as_deref(),
            no_backup,
            parse_options,
        ),
        Commands::Batch {
            input,
            output,
            profile,
        } => cmd_batch(&input, output.as_deref(), profile.as_deref(), parse_options),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_profile(profile: Option<&Path>) -> kitdoc::Result<ExtractOptions> {
    match profile {
        Some(path) => ExtractOptions::from_file(path),
        None => Ok(ExtractOptions::default()),
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> CmdResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Save a rewritten document; overwriting the input takes a backup unless disabled.
fn save_rewritten(
    doc: &kitdoc::Document,
    input: &Path,
    output: Option<&Path>,
    operation: &str,
    no_backup: bool,
) -> CmdResult {
    let target = output.unwrap_or(input);
    let options = if no_backup {
        WriteOptions::new()
    } else {
        WriteOptions::new().with_backup(operation)
    };

    if let Some(backup) = kitdoc::save(doc, target, &options)? {
        println!("{} {}", "Backup".dimmed(), backup.display());
    }
    println!("{} {}", "Saved to".green(), target.display());
    Ok(())
}

fn cmd_inspect(input: &Path, profile: Option<&Path>, options: ParseOptions) -> CmdResult {
    let doc = parse_file_with_options(input, options)?;
    let extract_options = load_profile(profile)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }
    println!(
        "{}: {} ({} tables)",
        "Blocks".bold(),
        doc.block_count(),
        doc.tables().count()
    );

    println!();
    println!("{}", "Blocks".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for summary in summarize_blocks(&doc, &extract_options) {
        let marker = if summary.heading_like {
            "H".yellow().bold().to_string()
        } else {
            " ".to_string()
        };
        let mut detail = String::new();
        if let Some(ref style) = summary.style {
            detail.push_str(&format!(" [{}]", style));
        }
        if let (Some(rows), Some(columns)) = (summary.rows, summary.columns) {
            detail.push_str(&format!(" {}x{}", rows, columns));
            if !summary.labels.is_empty() {
                let labels: Vec<&str> = summary.labels.iter().map(|l| l.label()).collect();
                detail.push_str(&format!(" {{{}}}", labels.join(", ")));
            }
        }
        println!(
            "{:>4} {} {:<9}{} {}",
            summary.position,
            marker,
            summary.kind,
            detail.dimmed(),
            summary.preview
        );
    }

    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    profile: Option<&Path>,
    compact: bool,
    options: ParseOptions,
) -> CmdResult {
    let doc = parse_file_with_options(input, options)?;
    let extract_options = load_profile(profile)?;

    let report = kitdoc::extract::extract_report(&doc, &extract_options);
    for name in &report.missing {
        eprintln!("{} section not found: {}", "Warning".yellow(), name);
    }

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = kitdoc::render::report_to_json(&report, format)?;
    write_or_print(output, &json)
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    markdown: bool,
    frontmatter: bool,
    cleanup: Option<CleanupLevel>,
    options: ParseOptions,
) -> CmdResult {
    let doc = parse_file_with_options(input, options)?;

    let mut render_options = RenderOptions::new().with_frontmatter(frontmatter);
    if let Some(level) = cleanup {
        render_options = render_options.with_cleanup_preset(level.into());
    }

    let text = if markdown {
        kitdoc::render::to_markdown(&doc, &render_options)?
    } else {
        kitdoc::render::to_text(&doc, &render_options)?
    };
    write_or_print(output, &text)
}

fn cmd_replace(
    input: &Path,
    output: Option<&Path>,
    rules: Option<&Path>,
    no_backup: bool,
    options: ParseOptions,
) -> CmdResult {
    let replacements = match rules {
        Some(path) => load_rules_file(path)?,
        None => compile_rules(&default_rules())?,
    };

    let mut doc = parse_file_with_options(input, options)?;
    let stats = kitdoc::extract::replace_text(&mut doc, &replacements);

    for (description, count) in &stats.changed {
        println!("  {} {} ({} runs)", "├─".dimmed(), description, count);
    }
    println!(
        "{} {} edits in {} runs",
        "Replaced".green().bold(),
        stats.total(),
        stats.runs_visited
    );

    save_rewritten(&doc, input, output, "replace", no_backup)
}

fn cmd_tabulate(
    input: &Path,
    section: Option<&str>,
    output: Option<&Path>,
    no_backup: bool,
    options: ParseOptions,
) -> CmdResult {
    let spec = match section {
        Some(name) => SectionSpec::new(name),
        None => SectionSpec::reagents_provided(),
    };

    let mut doc = parse_file_with_options(input, options)?;
    match kitdoc::extract::tabulate_section(&mut doc, &spec, &ExtractOptions::default()) {
        TabulateOutcome::Converted {
            position,
            rows,
            columns,
        } => {
            println!(
                "{} {}x{} table at block {}",
                "Converted".green().bold(),
                rows,
                columns,
                position
            );
            save_rewritten(&doc, input, output, "tabulate", no_backup)
        }
        TabulateOutcome::NoRows => {
            println!("{} '{}' has no delimited rows; nothing written", "Skipped".yellow(), spec.name);
            Ok(())
        }
        TabulateOutcome::SectionNotFound => {
            println!("{} section '{}' not found; nothing written", "Skipped".yellow(), spec.name);
            Ok(())
        }
    }
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    profile: Option<&Path>,
    options: ParseOptions,
) -> CmdResult {
    let extract_options = load_profile(profile)?;
    let output_dir = output.unwrap_or(input);
    fs::create_dir_all(output_dir)?;

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("docx"))
                .unwrap_or(false)
        })
        .filter(|path| {
            // Skip Word lock files
            path.file_name()
                .map(|name| !name.to_string_lossy().starts_with("~$"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut failed = Vec::new();
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name.clone());

        let result = parse_file_with_options(path, options.clone()).and_then(|doc| {
            let report = kitdoc::extract::extract_report(&doc, &extract_options);
            let json = kitdoc::render::report_to_json(&report, JsonFormat::Pretty)?;
            let target = output_dir.join(path.with_extension("json").file_name().unwrap_or_default());
            fs::write(&target, json)?;
            Ok(())
        });
        if let Err(e) = result {
            failed.push((name, e));
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} files",
        "Extracted".green().bold(),
        files.len() - failed.len(),
        files.len()
    );
    for (name, e) in &failed {
        eprintln!("  {} {}: {}", "✗".red(), name, e);
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} file(s) failed", failed.len()).into())
    }
}

fn cmd_version() {
    println!("{} {}", "kitdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("ELISA kit datasheet extraction tool");
    println!();
    println!("License: MIT");
}
