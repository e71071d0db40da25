use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thumbsmith::imaging::{ImageMagickBackend, ThumbnailRequest, make_thumbnail, read_exif_path};
use thumbsmith::{config, output, scan};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "thumbsmith")]
#[command(about = "Inspect images and build thumbnails")]
#[command(long_about = "\
Inspect images and build thumbnails

Headers are sniffed without decoding pixels, so `info` is cheap even on
large directories. Thumbnails are named from their parameters and sized
the way ImageMagick will actually produce them:

  test.jpg  --width 192                      → test@192.jpg
  test.jpg  --width 192 --height 256 -q 20   → test@192x256_q20.jpg
  test.jpg  --width 192 --height 192 --crop  → test@192x192_crop.jpg

Settings are read from thumbsmith.toml in the current directory, or from
the file given with --config.

Run 'thumbsmith gen-config' to generate a documented thumbsmith.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults to ./thumbsmith.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print format and native size of images (directories are walked)
    Info {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print EXIF-derived metadata of one image
    Exif {
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Plan and build a thumbnail
    Thumbnail {
        file: PathBuf,
        /// Bounding box width
        #[arg(long)]
        width: u32,
        /// Bounding box height (keeps aspect ratio when omitted)
        #[arg(long)]
        height: Option<u32>,
        /// Fill the box and center-crop instead of fitting inside it
        #[arg(long)]
        crop: bool,
        /// Encoding quality, 1-100 (75 for PNG, 85 otherwise)
        #[arg(short, long)]
        quality: Option<u32>,
        /// URL path of the source (defaults to its file name)
        #[arg(long)]
        url_path: Option<String>,
        /// Directory the thumbnail's URL path is resolved against
        #[arg(long, default_value = "thumbs")]
        output: PathBuf,
        /// Print the plan without running ImageMagick
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a stock thumbsmith.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Info { paths, json } => {
            let config = load_config(cli.config.as_deref())?;
            init_thread_pool(&config.processing);
            let report = scan::scan(&paths);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let root = match paths.as_slice() {
                    [single] if single.is_dir() => Some(single.as_path()),
                    _ => None,
                };
                output::print_info_output(&report, root);
            }
        }
        Command::Exif { file, json } => {
            if !file.is_file() {
                return Err(format!("not a file: {}", file.display()).into());
            }
            let exif = read_exif_path(&file);
            if json {
                println!("{}", serde_json::to_string_pretty(&exif.to_dict())?);
            } else {
                output::print_exif_output(&exif);
            }
        }
        Command::Thumbnail {
            file,
            width,
            height,
            crop,
            quality,
            url_path,
            output: output_dir,
            dry_run,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut request = ThumbnailRequest::width(width);
            if let Some(height) = height {
                request = request.with_height(height);
            }
            if crop {
                request = request.cropped();
            }
            if let Some(quality) = quality {
                request = request.with_quality(quality);
            }

            let url_path = url_path.unwrap_or_else(|| default_url_path(&file));
            let planned = make_thumbnail(&file, &url_path, &request)?;

            let written = match &planned.build {
                Some(build) if !dry_run => {
                    let backend = ImageMagickBackend::locate(
                        config.imagemagick.executable.as_deref(),
                        &config.imagemagick.search_paths,
                    )?;
                    let dst = build.destination(&output_dir);
                    build.run(&backend, &dst)?;
                    Some(dst)
                }
                _ => None,
            };
            output::print_thumbnail_output(&planned, written.as_deref());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the `warn` default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit `--config` must exist; the implicit `./thumbsmith.toml` is optional.
fn load_config(explicit: Option<&Path>) -> Result<config::Config, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn default_url_path(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
