//! droidbuild - Android build helper
//!
//! Command-line entry point: loads build settings, applies overrides and runs
//! one build step.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use droidbuild::commands::{
    ApkCommand, LibsCommand, ManifestCommand, ProjectCommand, SelectSdkCommand,
};
use droidbuild::core::{BuildError, BuildSettings};
use droidbuild::toolchain::BuildEnvironment;

/// droidbuild - build Android native libraries and APKs
#[derive(Parser, Debug)]
#[command(name = "droidbuild")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file (default: the platform config dir's droidbuild/settings.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project directory; subprojects are relative to it
    #[arg(short = 'C', long, global = true)]
    project_dir: Option<PathBuf>,

    /// Android NDK root
    #[arg(long, global = true)]
    ndk_home: Option<PathBuf>,

    /// Android SDK root
    #[arg(long, global = true)]
    sdk_home: Option<PathBuf>,

    /// ant executable
    #[arg(long, global = true)]
    ant_path: Option<PathBuf>,

    /// ant target (release or debug)
    #[arg(long, global = true)]
    ant_target: Option<String>,

    /// Extra ant flags, whitespace separated
    #[arg(long, global = true, allow_hyphen_values = true)]
    ant_flags: Option<String>,

    /// Extra ndk-build make flags, whitespace separated
    #[arg(long, global = true, allow_hyphen_values = true)]
    make_flags: Option<String>,

    /// Keystore for signing release APKs
    #[arg(long, global = true)]
    keystore: Option<PathBuf>,

    /// File holding the keystore password
    #[arg(long, global = true)]
    passfile: Option<PathBuf>,

    /// Key alias inside the keystore
    #[arg(long, global = true)]
    keyalias: Option<String>,

    /// Sign release APKs
    #[arg(long, global = true)]
    sign: bool,

    /// Verbose tool output and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the SDK levels declared by an AndroidManifest.xml
    Manifest {
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the project name declared by a build.xml
    Project {
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick the highest installed SDK target within an API range
    SelectSdk {
        /// Lowest acceptable API level
        #[arg(long)]
        min: i32,

        /// Highest acceptable API level
        #[arg(long)]
        max: i32,

        /// Saved `android list target --compact` output to use instead of the android tool
        #[arg(long)]
        listing: Option<PathBuf>,
    },

    /// Build native libraries with ndk-build
    Libs {
        /// NDK subprojects, relative to the project directory
        #[arg(required = true)]
        subprojects: Vec<PathBuf>,

        /// Object output directory, relative to the project directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Package an APK with ant
    Apk {
        /// Android subproject, relative to the project directory
        subproject: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<BuildError>() {
            Some(build_error) => error!("{}", build_error.user_message()),
            None => error!("{:#}", e),
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli).await?;
    debug!("Settings: {:?}", settings);
    let env = BuildEnvironment::new(settings);

    let output = match cli.command {
        Commands::Manifest { path, json } => ManifestCommand { path, json }.execute()?,
        Commands::Project { path, json } => ProjectCommand { path, json }.execute()?,
        Commands::SelectSdk { min, max, listing } => {
            SelectSdkCommand {
                min_version: min,
                max_version: max,
                listing,
            }
            .execute(&env)
            .await?
        }
        Commands::Libs { subprojects, output } => {
            LibsCommand { subprojects, output }.execute(&env).await?
        }
        Commands::Apk { subproject, json } => ApkCommand { subproject, json }.execute(&env).await?,
    };

    println!("{}", output);
    Ok(())
}

/// Settings from file, overridden by command-line flags
async fn load_settings(cli: &Cli) -> Result<BuildSettings> {
    let mut settings = BuildSettings::load_or_default(cli.config.as_deref()).await?;
    apply_overrides(cli, &mut settings);
    Ok(settings)
}

fn apply_overrides(cli: &Cli, settings: &mut BuildSettings) {
    if let Some(ref dir) = cli.project_dir {
        settings.project_dir = dir.clone();
    }
    if let Some(ref ndk) = cli.ndk_home {
        settings.ndk_home = ndk.clone();
    }
    if let Some(ref sdk) = cli.sdk_home {
        settings.sdk_home = sdk.clone();
    }
    if let Some(ref ant) = cli.ant_path {
        settings.ant_path = ant.clone();
    }
    if let Some(ref target) = cli.ant_target {
        settings.ant_target = target.clone();
    }
    if let Some(ref flags) = cli.ant_flags {
        settings.ant_flags = flags.clone();
    }
    if let Some(ref flags) = cli.make_flags {
        settings.make_flags = flags.clone();
    }
    if let Some(ref keystore) = cli.keystore {
        settings.apk_keystore = Some(keystore.clone());
    }
    if let Some(ref passfile) = cli.passfile {
        settings.apk_passfile = Some(passfile.clone());
    }
    if let Some(ref alias) = cli.keyalias {
        settings.apk_keyalias = Some(alias.clone());
    }
    if cli.sign {
        settings.sign_apk = true;
    }
    if cli.verbose {
        settings.verbose = true;
    }
}
