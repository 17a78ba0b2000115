//! enginex CLI entrypoint
//! Parses command-line arguments and runs the scaffolding pipeline.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use enginex::core::config::{
    DEFAULT_BACKEND, EnvTemplateConfigReader, GenerationOptions, TestFramework,
    resolve_template_dir,
};
use enginex::core::Engine;
use enginex::generation::Pipeline;
use enginex::infrastructure::rails::DEFAULT_RAILS_COMMAND;
use enginex::infrastructure::{
    BackendRegistry, CommandExecutor, EmbeddedTemplateRepository, FileSystemTemplateLoader,
    RailsAppGenerator, ShellCommandExecutor, TemplateRepository,
};
use std::path::PathBuf;
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Creates a Rails engine with Rakefile, Gemfile and running tests.
#[derive(Parser, Debug)]
#[command(name = "enginex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the engine to be created
    path: PathBuf,

    /// Test framework to use: test_unit or rspec
    #[arg(short = 't', long, default_value = "test_unit")]
    test_framework: TestFramework,

    /// Datastore frameworks to use, e.g. active_record or mongoid (repeatable, comma separated)
    #[arg(short = 'o', long, value_delimiter = ',', default_value = DEFAULT_BACKEND)]
    orms: Vec<String>,

    /// Generate test-unit files in the dummy apps
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    tu: bool,

    /// Generate JavaScript files in the dummy apps
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    js: bool,

    /// Special app configurations, e.g. devise or authlogic (comma separated)
    #[arg(long, value_delimiter = ',')]
    postfixes: Vec<String>,

    /// Custom template directory (defaults to ENGINEX_TEMPLATE_DIR, then the built-in templates)
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// Program used to generate the dummy Rails apps
    #[arg(long, env = "ENGINEX_RAILS", default_value = DEFAULT_RAILS_COMMAND)]
    rails_command: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries the step status lines
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting enginex");

    let options = GenerationOptions {
        test_framework: cli.test_framework,
        backends: cli.orms,
        generate_test_unit: cli.tu,
        generate_javascript: cli.js,
        postfixes: cli.postfixes,
        template_dir: resolve_template_dir(cli.template_dir, &EnvTemplateConfigReader),
    };
    match serde_json::to_string(&options) {
        Ok(json) => debug!(options = %json, "Generation options"),
        Err(e) => debug!(error = %e, "Generation options are not serializable"),
    }

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let engine = Engine::new(&cli.path, &cwd).context("Invalid engine path")?;

    let templates: Arc<dyn TemplateRepository> = match &options.template_dir {
        Some(dir) => Arc::new(FileSystemTemplateLoader::new(dir)),
        None => Arc::new(EmbeddedTemplateRepository::new()),
    };
    let executor: Arc<dyn CommandExecutor> = Arc::new(ShellCommandExecutor::new());
    let generator = Arc::new(RailsAppGenerator::new(&cli.rails_command, executor.clone()));
    let backends = BackendRegistry::with_defaults(&cli.rails_command, executor);

    let pipeline = Pipeline::new(engine, options, templates, generator, backends)
        .context("Invalid generation options")?;

    let report = pipeline.run(std::io::stdout()).await.map_err(|e| {
        error!(error = %e, "Engine generation failed");
        anyhow::Error::new(e)
    })?;

    info!(
        root = %report.root.display(),
        apps = report.apps.len(),
        "Successfully generated engine"
    );
    Ok(())
}
