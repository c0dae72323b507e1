use clap::{Parser, Subcommand};
use gizmo_build::{LocalBuildConfig, Manifest, BUILD_MANIFEST, LOCAL_CONFIG_FILE, TEST_MANIFEST};
use gizmo_driver::Driver;
use miette::Result;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gizmo")]
#[command(author, version, about = "Build orchestrator for fragment-merged C++ projects")]
struct Cli {
    /// Project root holding the manifests, src/ and build/ (default: current directory)
    #[arg(short = 'C', long = "directory", global = true)]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one item, or all items, from build.json
    Build {
        /// Item to build (default: all items)
        item: Option<String>,

        /// Manifest to read instead of <root>/build.json
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Build the test binary of one item, or of all items, from test.json
    Test {
        /// Test item to build (default: all items)
        item: Option<String>,

        /// Manifest to read instead of <root>/test.json
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let root = cli.directory.unwrap_or_default();
    let driver = Driver::new(root.clone());

    match cli.command {
        Commands::Build { item, manifest } => {
            let manifest = load_manifest(manifest, &root, BUILD_MANIFEST)?;

            let kind = LocalBuildConfig::load(&root.join(LOCAL_CONFIG_FILE)).kind()?;
            log::info!("build kind: {}", kind);

            match item {
                Some(name) => {
                    driver.build(manifest.find_item(&name)?, kind)?;
                }
                None => {
                    driver.build_all(manifest.items(), kind)?;
                }
            }
        }

        Commands::Test { item, manifest } => {
            let manifest = load_manifest(manifest, &root, TEST_MANIFEST)?;

            match item {
                Some(name) => {
                    driver.test(manifest.find_item(&name)?)?;
                }
                None => {
                    driver.test_all(manifest.items())?;
                }
            }
        }
    }

    Ok(())
}

fn load_manifest(explicit: Option<PathBuf>, root: &Path, default_name: &str) -> Result<Manifest> {
    let path = explicit.unwrap_or_else(|| root.join(default_name));
    Ok(Manifest::from_file(&path)?)
}
