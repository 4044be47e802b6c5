use clap::{Parser, Subcommand};
use simple_invite::{config, generate, output, scan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simple-invite")]
#[command(about = "Static site generator for a wedding invitation page")]
#[command(long_about = "\
Static site generator for a wedding invitation page

The invitation text and a folder of photos become a single page: couple and
family names, one card per event with map and RSVP links, and a photo strip
with a full-screen viewer.

Content structure:

  content/
  ├── config.toml          # Site config (optional)
  ├── invitation.txt       # Text holding an <invitation> ... </invitation> block
  └── gallery/             # Local photos, used when no remote folder is set
      └── first-look.jpg

Invitation block:

  <invitation>
  Groom: ...
  Bride: ...
  Family Name: ...

  Wedding:
  Date: ...
  Venue: ...
  </invitation>

Run 'simple-invite gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".simple-invite-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read invitation and gallery into a manifest
    Scan,
    /// Produce the page from the manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate the content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &manifest.config.fallback);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let config = read_manifest_config(&manifest_path)?;
            init_thread_pool(&config.processing);
            let report = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let manifest_path = write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &manifest.config.fallback);

            println!("==> Stage 2: Generating page → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let report = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &manifest.config.fallback);
            if let Some(err) = &manifest.load_error {
                return Err(format!("invitation not usable: {err}").into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(temp_dir)?;
    let manifest_path = temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&manifest_path, json)?;
    Ok(manifest_path)
}

fn read_manifest_config(
    manifest_path: &Path,
) -> Result<config::SiteConfig, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(manifest_path)?;
    let manifest: serde_json::Value = serde_json::from_str(&content)?;
    match manifest.get("config") {
        Some(value) => Ok(serde_json::from_value(value.clone())?),
        None => Ok(config::SiteConfig::default()),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
