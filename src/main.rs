//! Tachie CLI - Command-line tool for LSF portrait inspection and compositing.
//!
//! This is the main entry point for the Tachie command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use tachie::compose::DEFAULT_STEM;
use tachie::lsf::RECORD_SIZE;
use tachie::prelude::*;

/// Tachie - LSF portrait layer compositor
#[derive(Parser)]
#[command(name = "tachie")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every painted layer
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the canvas, entries and variant keys of an LSF file
    Info {
        /// Path to the LSF file
        #[arg(short, long)]
        input: PathBuf,

        /// Print the decoded index as JSON
        #[arg(long)]
        json: bool,

        /// Dump the 28 raw header bytes
        #[arg(long)]
        raw_header: bool,

        /// Dump the raw bytes of each record from its placement field on
        #[arg(long)]
        raw_records: bool,
    },

    /// Parse every LSF file in a directory and report the broken ones
    Scan {
        /// Directory holding LSF files
        #[arg(short, long, env = "TACHIE_ASSET_DIR")]
        dir: PathBuf,

        /// Filter pattern for file names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Composite one variant to a PNG
    Render {
        /// Path to the LSF file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory holding the layer PNGs (defaults to the LSF's directory)
        #[arg(short, long, env = "TACHIE_ASSET_DIR")]
        dir: Option<PathBuf>,

        /// Base image id
        #[arg(short, long, default_value_t = 0)]
        base: u8,

        /// Face difference as SLOT=ID (repeatable)
        #[arg(long = "face", value_parser = parse_slot_id)]
        faces: Vec<(u8, u8)>,

        /// Face effect as SLOT=ID (repeatable)
        #[arg(long = "effect", value_parser = parse_slot_id)]
        effects: Vec<(u8, u8)>,

        /// Holy light id (0 for none)
        #[arg(long, default_value_t = 0)]
        holy: u8,

        /// Output PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for uniquely named output when no output file is given
        #[arg(long, env = "TACHIE_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Render every face difference against every base pose
    Batch {
        /// Path to the LSF file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory holding the layer PNGs (defaults to the LSF's directory)
        #[arg(short, long, env = "TACHIE_ASSET_DIR")]
        dir: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, env = "TACHIE_OUTPUT_DIR")]
        output: PathBuf,
    },

    /// Compare the raw headers of two LSF files
    HeaderDiff {
        /// First LSF file
        left: PathBuf,

        /// Second LSF file
        right: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info {
            input,
            json,
            raw_header,
            raw_records,
        } => {
            cmd_info(&input, json, raw_header, raw_records)?;
        }
        Commands::Scan { dir, filter } => {
            cmd_scan(&dir, filter.as_deref())?;
        }
        Commands::Render {
            input,
            dir,
            base,
            faces,
            effects,
            holy,
            output,
            output_dir,
        } => {
            let selection = Selection {
                base_id: base,
                face_differences: faces.into_iter().collect(),
                face_effects: effects.into_iter().collect(),
                holy_light: holy,
            };
            cmd_render(&input, dir.as_deref(), &selection, output.as_deref(), &output_dir)?;
        }
        Commands::Batch { input, dir, output } => {
            cmd_batch(&input, dir.as_deref(), &output)?;
        }
        Commands::HeaderDiff { left, right } => {
            cmd_header_diff(&left, &right)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_info(input: &Path, json: bool, raw_header: bool, raw_records: bool) -> Result<()> {
    let index = AssetIndex::open(input).context("Failed to parse LSF file")?;

    if json {
        let text = serde_json::to_string_pretty(&index).context("Failed to serialize index")?;
        println!("{}", text);
        return Ok(());
    }

    println!("Name: {}", index.name());
    println!(
        "Canvas: {}x{}, file kind {}",
        index.canvas_width(),
        index.canvas_height(),
        index.file_kind()
    );

    if raw_header {
        println!("Header: {:?}", index.raw_header());
    }

    println!("\nEntries ({}):", index.entries().len());
    for entry in index.entries() {
        println!(
            "  {:>3} {:<20} {:>5} {:>5} kind={:<3} id={:<3} mode={} {}",
            entry.index,
            entry.name,
            entry.x,
            entry.y,
            entry.kind,
            entry.group_id,
            entry.mode,
            entry.role()
        );
    }

    if raw_records {
        println!("\nRecord tails:");
        for entry in index.entries() {
            if let Some(tail) = index.record_tail(entry.index) {
                println!("  {:<20} {:?}", entry.name, tail);
            }
        }
    }

    println!("\nBase images: {:?}", index.base_image_keys());
    println!("Face differences: {:?}", index.face_difference_keys());
    println!("Face effects: {:?}", index.face_effect_keys());
    println!("Holy light: {:?}", index.holy_light_keys());
    if let Some(naked) = index.naked_image() {
        println!("Naked image: {}", naked.name);
    }

    Ok(())
}

fn cmd_scan(dir: &Path, filter: Option<&str>) -> Result<()> {
    let pattern = filter
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid filter pattern")?;

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("lsf"))
        })
        .filter(|p| match (&pattern, p.file_name().and_then(|n| n.to_str())) {
            (Some(pattern), Some(name)) => pattern.matches(name),
            (Some(_), None) => false,
            (None, _) => true,
        })
        .collect();

    println!("Scanning {} LSF files in {}...", files.len(), dir.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match AssetIndex::open(path) {
            Ok(index) => {
                pb.println(format!(
                    "{}: base {:?}, faces {:?}, effects {:?}, holy light {:?}",
                    index.name(),
                    index.base_image_keys(),
                    index.face_difference_keys(),
                    index.face_effect_keys(),
                    index.holy_light_keys()
                ));
                valid.push(file_name);
            }
            Err(e) => {
                pb.println(format!("Error processing file {}: {}", file_name, e));
                invalid.push(file_name);
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();
    println!("Valid files ({}): {:?}", valid.len(), valid);
    println!("Invalid files ({}): {:?}", invalid.len(), invalid);

    Ok(())
}

fn cmd_render(
    input: &Path,
    dir: Option<&Path>,
    selection: &Selection,
    output: Option<&Path>,
    output_dir: &Path,
) -> Result<()> {
    let index = AssetIndex::open(input).context("Failed to parse LSF file")?;
    let loader = DirectoryLoader::new(asset_dir(input, dir));

    let effective = selection
        .normalized(&index)
        .context("Failed to resolve selection")?;
    println!(
        "Rendering {}: base {}, faces {:?}, effects {:?}, holy light {}",
        index.name(),
        effective.base_id,
        effective.face_differences,
        effective.face_effects,
        effective.holy_light
    );

    let start = Instant::now();
    let report = compose(&index, selection, &loader).context("Failed to composite layers")?;

    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.name, skipped.reason);
    }

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => unique_output_path(output_dir, DEFAULT_STEM),
    };
    save_png(&report.canvas, &path).context("Failed to write output image")?;

    println!("Saved {} in {:?}", path.display(), start.elapsed());

    Ok(())
}

fn cmd_batch(input: &Path, dir: Option<&Path>, output: &Path) -> Result<()> {
    let index = AssetIndex::open(input).context("Failed to parse LSF file")?;
    let loader = DirectoryLoader::new(asset_dir(input, dir));
    let variants = face_difference_variants(&index);

    println!(
        "Rendering {} variants of {} to {}...",
        variants.len(),
        index.name(),
        output.display()
    );

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(variants.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let errors = AtomicUsize::new(0);

    variants.par_iter().for_each(|variant| {
        let path = output.join(format!("{}.png", variant.file_stem));
        let result = compose(&index, &variant.selection, &loader)
            .and_then(|report| save_png(&report.canvas, &path));

        if let Err(e) = result {
            pb.println(format!("Error rendering {}: {}", variant.file_stem, e));
            errors.fetch_add(1, Ordering::Relaxed);
        }

        pb.inc(1);
    });

    pb.finish_with_message("Done");
    println!(
        "Rendered {} variants in {:?} ({} errors)",
        variants.len(),
        start.elapsed(),
        errors.load(Ordering::Relaxed)
    );

    Ok(())
}

fn cmd_header_diff(left: &Path, right: &Path) -> Result<()> {
    let left_index = AssetIndex::open(left).context("Failed to parse first LSF file")?;
    let right_index = AssetIndex::open(right).context("Failed to parse second LSF file")?;

    println!("0:\t{:?}", left_index.raw_header());
    println!("1:\t{:?}", right_index.raw_header());

    let diff = header_diff(left_index.raw_header(), right_index.raw_header());
    for d in &diff {
        println!("{}:\t{}\t{}", d.offset, d.left, d.right);
    }
    println!(
        "\n{} differing header bytes (records are {} bytes each: {} vs {})",
        diff.len(),
        RECORD_SIZE,
        left_index.entries().len(),
        right_index.entries().len()
    );

    Ok(())
}

/// Layer directory: the explicit one, else the LSF file's own directory.
fn asset_dir(input: &Path, dir: Option<&Path>) -> PathBuf {
    dir.map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Parse a `SLOT=ID` pair.
fn parse_slot_id(s: &str) -> std::result::Result<(u8, u8), String> {
    let (slot, id) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SLOT=ID, got {:?}", s))?;
    let slot = slot
        .trim()
        .parse()
        .map_err(|e| format!("invalid slot {:?}: {}", slot, e))?;
    let id = id
        .trim()
        .parse()
        .map_err(|e| format!("invalid id {:?}: {}", id, e))?;
    Ok((slot, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot_id() {
        assert_eq!(parse_slot_id("1=2"), Ok((1, 2)));
        assert_eq!(parse_slot_id(" 3 = 0 "), Ok((3, 0)));
        assert!(parse_slot_id("12").is_err());
        assert!(parse_slot_id("1=300").is_err());
    }

    #[test]
    fn test_asset_dir_defaults_to_input_parent() {
        let input = Path::new("data/ev_0/EV_B09.lsf");
        assert_eq!(asset_dir(input, None), PathBuf::from("data/ev_0"));
        assert_eq!(
            asset_dir(input, Some(Path::new("pngs"))),
            PathBuf::from("pngs")
        );
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "tachie", "render", "-i", "a.lsf", "--face", "1=2", "--face", "2=1", "--effect",
            "1=1", "--holy", "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Render {
                faces,
                effects,
                holy,
                ..
            } => {
                assert_eq!(faces, vec![(1, 2), (2, 1)]);
                assert_eq!(effects, vec![(1, 1)]);
                assert_eq!(holy, 3);
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_cli_parses_info_dump_flags() {
        let cli =
            Cli::try_parse_from(["tachie", "info", "-i", "a.lsf", "--raw-header", "--raw-records"])
                .unwrap();

        match cli.command {
            Commands::Info {
                json,
                raw_header,
                raw_records,
                ..
            } => {
                assert!(!json);
                assert!(raw_header);
                assert!(raw_records);
            }
            _ => panic!("expected info command"),
        }
    }
}
