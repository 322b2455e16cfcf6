//! squid2xopp CLI - Squid note to Xournal++ converter

mod reporter;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use squidxopp::archive::distinct_background_ids;
use squidxopp::record::{to_json, JsonFormat, PageDump};
use squidxopp::{
    ConvertOptions, Converter, ErrorMode, NoteArchive, NullReporter, ProjectOptions, Reporter,
};

use reporter::TerminalReporter;

#[derive(Parser)]
#[command(name = "squid2xopp")]
#[command(version)]
#[command(about = "Convert Squid Note files to Xournal++ format", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Input note file; outputs are named after it
    #[arg(short = 'f', long = "filename", value_name = "FILE")]
    filename: Option<PathBuf>,

    /// Scale stroke width
    #[arg(short = 's', long, default_value_t = 1.0)]
    stroke_scale: f64,

    /// Scale highlight width
    #[arg(short = 'l', long, default_value_t = 1.0)]
    highlight_scale: f64,

    /// DPI for embedded images
    #[arg(short = 'd', long, default_value_t = squidxopp::render::DEFAULT_IMAGE_DPI)]
    image_dpi: u32,

    /// Also write an uncompressed XML copy
    #[arg(short = 'x', long)]
    xml: bool,

    /// Do not write any files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Disable progress reporting
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Skip pages that cannot be decoded instead of aborting
    #[arg(long)]
    lenient: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show note information
    Info {
        /// Input note file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print a decoded page record as JSON
    Dump {
        /// Input note file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// 1-based page number in index order
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Info { ref input }) => cmd_info(input),
        Some(Commands::Dump {
            ref input,
            page,
            compact,
        }) => cmd_dump(input, page, compact),
        None => match cli.filename {
            Some(ref input) => cmd_convert(input, &cli),
            None => {
                println!("{}", "Usage: squid2xopp -f <FILE> [OPTIONS]".yellow());
                println!("       squid2xopp --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(input: &Path, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let reporter: Box<dyn Reporter> = if cli.quiet {
        Box::new(NullReporter)
    } else {
        Box::new(TerminalReporter)
    };

    let options = ConvertOptions::new()
        .with_project_options(
            ProjectOptions::new()
                .with_stroke_scale(cli.stroke_scale)
                .with_highlight_scale(cli.highlight_scale)
                .with_image_dpi(cli.image_dpi),
        )
        .with_dry_run(cli.dry_run)
        .with_xml(cli.xml)
        .with_error_mode(if cli.lenient {
            ErrorMode::Lenient
        } else {
            ErrorMode::Strict
        });

    log::debug!("converting {} with {:?}", input.display(), options);
    let converter = Converter::with_reporter(reporter);
    let result = converter.convert_file(input, &options)?;

    let stats = &result.stats;
    converter.reporter().success(&format!(
        "Finished: {} pages, {} strokes, {} images, {} warnings",
        stats.page_count, stats.stroke_count, stats.image_count, stats.warning_count
    ));
    if stats.skipped_page_count > 0 || stats.skipped_item_count > 0 {
        converter.reporter().warning(&format!(
            "Skipped {} pages and {} items",
            stats.skipped_page_count, stats.skipped_item_count
        ));
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let archive = NoteArchive::open(input)?;
    let summary = archive.summary();
    let pages = squidxopp::read_page_index(input)?;
    let backgrounds = distinct_background_ids(&pages);

    println!("{}", "Note Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Entries".bold(), archive.len());
    println!(
        "{}: {}",
        "Database".bold(),
        if summary.has_database { "Yes" } else { "No" }
    );
    println!("{}: {}", "Pages".bold(), pages.len());
    println!("{}: {}", "Page records".bold(), summary.page_records.len());
    println!("{}: {}", "Background documents".bold(), summary.documents);
    println!("{}: {}", "Images".bold(), summary.images);
    if summary.other > 0 {
        println!("{}: {}", "Other entries".bold(), summary.other);
    }

    println!();
    println!("{}", "Page Order".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (i, page) in pages.iter().enumerate() {
        if page.has_background_doc() {
            println!(
                "{:>4}  {}  {}",
                i + 1,
                page.page_id,
                page.background_doc_id.dimmed()
            );
        } else {
            println!("{:>4}  {}", i + 1, page.page_id);
        }
    }

    if !backgrounds.is_empty() {
        println!();
        println!("{}", "Background Documents".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for id in backgrounds {
            println!("  {}", id);
        }
    }

    Ok(())
}

fn cmd_dump(input: &Path, page: usize, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (page_ref, decoded) = squidxopp::read_page_at(input, page)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = to_json(&PageDump::new(page, page_ref, decoded), format)?;
    println!("{}", json);

    Ok(())
}
