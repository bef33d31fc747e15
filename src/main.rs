use clap::{Parser, Subcommand};
use imageprep::imaging::Anchor;
use imageprep::{BoxSize, PrepareConfig, Preparer, ProcessError, WatermarkConfig, batch};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "imageprep")]
#[command(about = "Fit-to-box image preparation: resize, watermark, thumbnail, JPEG output")]
#[command(long_about = "\
Fit-to-box image preparation: resize, watermark, thumbnail, JPEG output

Scales JPEG/PNG sources down to fit the configured bounding box (aspect ratio
preserved, never upscaled), optionally composites a transparent PNG watermark,
optionally writes an independent thumbnail, and encodes everything as JPEG.
GIF sources are copied through unresized.

Existing destinations are never overwritten: re-running over the same output
paths fails per file instead of clobbering.")]
#[command(version)]
struct Cli {
    /// TOML config file; command-line flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Main bounding box width in pixels
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Main bounding box height in pixels
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Thumbnail bounding box width in pixels
    #[arg(long, global = true)]
    thumb_width: Option<u32>,

    /// Thumbnail bounding box height in pixels
    #[arg(long, global = true)]
    thumb_height: Option<u32>,

    /// PNG watermark to composite onto main outputs
    #[arg(long, global = true)]
    watermark: Option<PathBuf>,

    /// Watermark placement: center or bottom-right
    #[arg(long, global = true)]
    anchor: Option<Anchor>,

    /// JPEG quality (1-100)
    #[arg(long, global = true)]
    quality: Option<u32>,

    /// Advisory memory ceiling for the process, in megabytes
    #[arg(long, global = true)]
    max_memory_mb: Option<u64>,

    /// Advisory CPU time ceiling for the process, in seconds
    #[arg(long, global = true)]
    max_time_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prepare a single image
    File {
        source: PathBuf,
        dest: PathBuf,
        /// Also write a thumbnail to this path
        #[arg(long)]
        thumb: Option<PathBuf>,
    },
    /// Prepare every image at the top level of a directory
    Batch {
        in_dir: PathBuf,
        out_dir: PathBuf,
        /// Also write a `<stem>_thumb.jpg` per image
        #[arg(long)]
        thumbs: bool,
    },
}

fn build_config(cli: &Cli) -> Result<PrepareConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => PrepareConfig::from_toml_file(path)?,
        None => PrepareConfig::default(),
    };

    if let Some(width) = cli.width {
        config.main_box = BoxSize::new(width, config.main_box.height);
    }
    if let Some(height) = cli.height {
        config.main_box = BoxSize::new(config.main_box.width, height);
    }
    if let Some(width) = cli.thumb_width {
        config.thumb_box = BoxSize::new(width, config.thumb_box.height);
    }
    if let Some(height) = cli.thumb_height {
        config.thumb_box = BoxSize::new(config.thumb_box.width, height);
    }
    if let Some(path) = &cli.watermark {
        let anchor = cli
            .anchor
            .or(config.watermark.as_ref().map(|w| w.anchor))
            .unwrap_or_default();
        config.watermark = Some(WatermarkConfig {
            path: path.clone(),
            anchor,
        });
    } else if let Some(anchor) = cli.anchor
        && let Some(watermark) = config.watermark.as_mut()
    {
        watermark.anchor = anchor;
    }
    if let Some(quality) = cli.quality {
        config.jpeg_quality = quality.into();
    }
    if let Some(mb) = cli.max_memory_mb {
        config.limits.max_memory_mb = Some(mb);
    }
    if let Some(secs) = cli.max_time_secs {
        config.limits.max_time_secs = Some(secs);
    }

    Ok(config)
}

fn report(source: &std::path::Path, result: &Result<imageprep::Outcome, ProcessError>) {
    match result {
        Ok(outcome) => {
            match outcome.advisory {
                Some(advisory) => println!("ok   {} ({advisory})", source.display()),
                None => println!("ok   {}", source.display()),
            };
        }
        Err(error) => println!("fail {}: {error}", source.display()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };
    let preparer = Preparer::new(config);

    match &cli.command {
        Command::File {
            source,
            dest,
            thumb,
        } => {
            let result = preparer.process(source, dest, thumb.as_deref());
            report(source, &result);
            match result {
                Ok(_) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Command::Batch {
            in_dir,
            out_dir,
            thumbs,
        } => {
            let entries = match batch::run(&preparer, in_dir, out_dir, *thumbs) {
                Ok(entries) => entries,
                Err(error) => {
                    eprintln!("error: {error}");
                    return ExitCode::FAILURE;
                }
            };
            for entry in &entries {
                report(&entry.source, &entry.result);
            }
            let failed = entries.iter().filter(|e| !e.succeeded()).count();
            println!("{} processed, {} failed", entries.len() - failed, failed);
            if failed > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}
