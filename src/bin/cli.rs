use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use mgscope::config::Config;
use mgscope::error::ScopeError;
use mgscope::matcher::APPROVED_VERBS;
use mgscope::output::OutputFormat;
use mgscope::resolver::metadata::MetadataPermissionSource;
use mgscope::session::{FileSessionContext, NoSession, SessionContext};
use mgscope::AnalyzeOptions;

#[derive(Parser)]
#[command(
    name = "mgscope",
    about = "Static analyzer for Microsoft Graph PowerShell scripts",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a script for Graph cmdlets and their required permissions
    Analyze {
        /// Path to the PowerShell script
        script: PathBuf,

        /// Permission metadata file (JSON export of the Graph command tables)
        #[arg(long, short = 'p')]
        permissions: PathBuf,

        /// Session context file with currently granted scopes
        #[arg(long)]
        context: Option<PathBuf>,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, csv, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Graph API version (v1.0, beta); overrides the config value
        #[arg(long)]
        api_version: Option<String>,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List the approved verbs the cmdlet matcher recognizes
    ListVerbs,

    /// Generate a starter .mgscope.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            script,
            permissions,
            context,
            config,
            format,
            api_version,
            output,
        } => cmd_analyze(script, permissions, context, config, format, api_version, output),
        Commands::ListVerbs => cmd_list_verbs(),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_analyze(
    script: PathBuf,
    permissions: PathBuf,
    context: Option<PathBuf>,
    config: Option<PathBuf>,
    format_str: String,
    api_version: Option<String>,
    output_path: Option<PathBuf>,
) -> Result<i32, ScopeError> {
    // Input validation happens before the pipeline runs.
    if !script.is_file() {
        return Err(ScopeError::Script(format!(
            "script not found: {}",
            script.display()
        )));
    }

    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let source = MetadataPermissionSource::load(&permissions)?;
    tracing::debug!(
        file = %permissions.display(),
        cmdlets = source.command_count(),
        "loaded permission metadata"
    );

    let session: Box<dyn SessionContext> = match context {
        Some(path) => Box::new(FileSessionContext::load(&path)?),
        None => Box::new(NoSession),
    };

    let options = AnalyzeOptions {
        config_path: config,
        format,
        api_version_override: api_version,
    };

    let report = mgscope::analyze(&script, &source, session.as_ref(), &options)?;
    let rendered = mgscope::render_report(&report, format)?;

    // An unwritable sink must not lose the result set.
    match output_path {
        Some(out) => {
            if let Err(e) = std::fs::write(&out, &rendered) {
                tracing::warn!(file = %out.display(), error = %e, "could not write output file");
                print!("{}", rendered);
            }
        }
        None => print!("{}", rendered),
    }

    Ok(0)
}

fn cmd_list_verbs() -> Result<i32, ScopeError> {
    for verb in APPROVED_VERBS {
        println!("{}", verb);
    }
    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, ScopeError> {
    let path = PathBuf::from(".mgscope.toml");

    if path.exists() && !force {
        eprintln!(".mgscope.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .mgscope.toml");

    Ok(0)
}
