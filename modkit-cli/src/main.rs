//! # modkit
//!
//! CLI for analyzing module sources and emitting engine registration
//! metadata.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze sources and write metadata.json
//! modkit analyze
//!
//! # Preview the metadata without writing
//! modkit analyze --dry-run
//!
//! # Record the registration calls a real installation would make
//! modkit register
//!
//! # Initialize a configuration file
//! modkit init
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use modkit::{ModuleType, RecordingEngine};
use modkit_cli::{
    analyze_project,
    config::{CliArgs, Config, ConfigManager},
    error::CliError,
    writer::{MetadataWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "modkit")]
#[command(author, version, about = "Analyze module sources and emit engine registration metadata", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze sources and write the module metadata file
    Analyze {
        /// Project root containing the sources
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for the metadata file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Module name override
        #[arg(long)]
        name: Option<String>,

        /// Main object override
        #[arg(long)]
        main_object: Option<String>,

        /// Preview the metadata without writing
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Analyze sources and record the registration calls
    Register {
        /// Project root containing the sources
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Module name override
        #[arg(long)]
        name: Option<String>,

        /// Main object override
        #[arg(long)]
        main_object: Option<String>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new modkit configuration file
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = "modkit.toml")]
        output: PathBuf,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            name,
            main_object,
            dry_run,
            config,
        } => cmd_analyze(input, output, name, main_object, dry_run, config),

        Commands::Register {
            input,
            name,
            main_object,
            config,
        } => cmd_register(input, name, main_object, config),

        Commands::Init { output, force } => cmd_init(output, force),
    }
}

fn load_config(
    config_path: Option<&PathBuf>,
    name: Option<String>,
    main_object: Option<String>,
    output: Option<PathBuf>,
) -> Result<Config, CliError> {
    let config = ConfigManager::load(config_path.map(|p| p.as_path()))?;
    Ok(ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            module_name: name,
            main_object,
            output,
            ..Default::default()
        },
    ))
}

/// Analyze command implementation.
fn cmd_analyze(
    input: PathBuf,
    output: Option<PathBuf>,
    name: Option<String>,
    main_object: Option<String>,
    dry_run: bool,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_ref(), name, main_object, output)?;

    println!("{}", "Analyzing module sources...".cyan());
    let metadata = analyze_project(&input, &config)?;

    println!(
        "  Found {} type(s), main object {}",
        metadata.type_names().count().to_string().green(),
        metadata.main_object.green()
    );

    let content = if config.output.pretty {
        serde_json::to_string_pretty(&metadata)?
    } else {
        serde_json::to_string(&metadata)?
    };

    let output_path = config.output.dir.join(&config.output.file);
    let writer = MetadataWriter::new(dry_run);

    match writer.write(&output_path, &content)? {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{content}");
        }
    }

    Ok(())
}

/// Register command implementation.
///
/// Installs into a recording engine and prints what a real engine would
/// receive.
fn cmd_register(
    input: PathBuf,
    name: Option<String>,
    main_object: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_ref(), name, main_object, None)?;

    println!("{}", "Analyzing module sources...".cyan());
    let metadata = analyze_project(&input, &config)?;

    let engine = RecordingEngine::new();
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let id = runtime.block_on(modkit::register(&engine, &metadata))?;

    let installed = engine.installed();
    let module = &installed[0];
    println!(
        "{} Module {} installed as {}",
        "✓".green(),
        module.name.green(),
        id
    );
    for entry in &module.types {
        match entry {
            ModuleType::Object(obj) if obj.interface => {
                println!("  interface {}", obj.name);
            }
            ModuleType::Object(obj) => {
                println!(
                    "  object {} ({} field(s), {} function(s))",
                    obj.name,
                    obj.fields.len(),
                    obj.functions.len()
                );
            }
            ModuleType::Enum(en) => {
                println!("  enum {} ({} member(s))", en.name, en.members.len());
            }
        }
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}
