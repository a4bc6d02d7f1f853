mod cli;

use cli::{Args, Command};
use scenario_deps::adapters::outbound::console::StderrProgressReporter;
use scenario_deps::adapters::outbound::filesystem::{
    CachingScenarioWorkspace, FileSystemReportStore, FileSystemScenarioWorkspace, WorkspaceLayout,
};
use scenario_deps::adapters::outbound::storage::JsonFileDependencyStore;
use scenario_deps::application::dto::{
    AnalysisOutput, AnalyzeRequest, BundleRequest, DeploymentRequest, OptimizeRequest, OutputFormat,
};
use scenario_deps::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use scenario_deps::application::use_cases::{
    AnalyzeScenarioUseCase, DependencyGraphUseCase, DeploymentReportUseCase,
    OptimizeScenarioUseCase,
};
use scenario_deps::config::{discover_config, load_config_from_path, ConfigFile, CONFIG_FILENAME};
use scenario_deps::dependency_analysis::domain::ScenarioName;
use scenario_deps::dependency_analysis::services::{DependencyDetector, NameCatalog};
use scenario_deps::shared::error::ExitCode;
use scenario_deps::shared::Result;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Store file created under the scenarios root when none is configured
const DEFAULT_STORE_FILENAME: &str = ".scenario-deps.json";

type Workspace = Arc<CachingScenarioWorkspace<FileSystemScenarioWorkspace>>;

fn main() {
    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

/// `-v` raises the level; `RUST_LOG` overrides it. Logs go to stderr.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.root.as_deref())?;

    let root = args
        .root
        .clone()
        .or_else(|| config.scenarios_root.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let store_path = args
        .store
        .clone()
        .or_else(|| config.store_path.clone())
        .unwrap_or_else(|| root.join(DEFAULT_STORE_FILENAME));
    let format = match (args.format, config.format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(configured)) => configured.parse().map_err(anyhow::Error::msg)?,
        (None, None) => OutputFormat::default(),
    };

    let mut layout = WorkspaceLayout::new(&root);
    layout.resources_root = config.resources_root.clone();
    layout.shared_workflows_root = config.shared_workflows_root.clone();
    layout.extra_resources = config.extra_resources.clone().unwrap_or_default();
    let workspace: Workspace = Arc::new(CachingScenarioWorkspace::new(
        FileSystemScenarioWorkspace::new(layout)?,
    ));

    debug!(root = %root.display(), store = %store_path.display(), %format, "workspace ready");

    let output = execute(args.command, &workspace, &root, &store_path, &config)?;

    eprintln!("{}", FormatterFactory::progress_message(format, &output));
    let rendered = FormatterFactory::create(format).format(&output)?;
    PresenterFactory::create(PresenterType::from(args.output)).present(&rendered)
}

/// An explicit `--config` must load; otherwise the file is looked up in
/// `--root`, then the working directory
fn load_config(explicit: Option<&Path>, root: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    let dir = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir()?,
    };
    match discover_config(&dir)? {
        Some(config) => {
            eprintln!(
                "⚙️  Auto-discovered config file: {}",
                dir.join(CONFIG_FILENAME).display()
            );
            Ok(config)
        }
        None => Ok(ConfigFile::default()),
    }
}

fn execute(
    command: Command,
    workspace: &Workspace,
    root: &Path,
    store_path: &Path,
    config: &ConfigFile,
) -> Result<AnalysisOutput> {
    let progress = StderrProgressReporter::new();

    let output = match command {
        Command::Analyze { scenario, apply } => {
            let request = AnalyzeRequest::new(ScenarioName::new(scenario)?, apply);
            AnalysisOutput::Analysis(analyzer(workspace, store_path, progress)?.execute(request)?)
        }
        Command::AnalyzeAll => {
            AnalysisOutput::Batch(analyzer(workspace, store_path, progress)?.analyze_all()?)
        }
        Command::Graph { graph_type } => {
            AnalysisOutput::Graph(graphs(workspace, store_path, config, progress).graph(graph_type)?)
        }
        Command::Cycles => {
            AnalysisOutput::Cycles(graphs(workspace, store_path, config, progress).cycles()?)
        }
        Command::Impact { dependency } => AnalysisOutput::Impact(
            graphs(workspace, store_path, config, progress).impact(&dependency)?,
        ),
        Command::Optimize { scenario, apply } => {
            let use_case = OptimizeScenarioUseCase::new(
                Arc::clone(workspace),
                DependencyDetector::new(Arc::clone(workspace))?,
                config.tier_policy(),
                progress,
            );
            AnalysisOutput::Optimization(
                use_case.execute(OptimizeRequest::new(ScenarioName::new(scenario)?, apply))?,
            )
        }
        Command::Deployment { scenario, refresh } => {
            let request = DeploymentRequest::new(ScenarioName::new(scenario)?, refresh);
            AnalysisOutput::Deployment(deployments(workspace, root, config, progress).execute(request)?)
        }
        Command::Bundle {
            scenario,
            tier,
            write,
        } => {
            let request = BundleRequest::new(ScenarioName::new(scenario)?, tier, write);
            AnalysisOutput::Bundle(deployments(workspace, root, config, progress).bundle(request)?)
        }
    };
    Ok(output)
}

fn analyzer(
    workspace: &Workspace,
    store_path: &Path,
    progress: StderrProgressReporter,
) -> Result<AnalyzeScenarioUseCase<Workspace, Workspace, JsonFileDependencyStore, StderrProgressReporter>>
{
    Ok(AnalyzeScenarioUseCase::new(
        Arc::clone(workspace),
        DependencyDetector::new(Arc::clone(workspace))?,
        JsonFileDependencyStore::new(store_path),
        progress,
    ))
}

fn graphs(
    workspace: &Workspace,
    store_path: &Path,
    config: &ConfigFile,
    progress: StderrProgressReporter,
) -> DependencyGraphUseCase<JsonFileDependencyStore, NameCatalog, StderrProgressReporter> {
    DependencyGraphUseCase::new(
        JsonFileDependencyStore::new(store_path),
        NameCatalog::from_source(workspace),
        config.impact_thresholds(),
        progress,
    )
}

fn deployments(
    workspace: &Workspace,
    root: &Path,
    config: &ConfigFile,
    progress: StderrProgressReporter,
) -> DeploymentReportUseCase<Workspace, FileSystemReportStore, StderrProgressReporter> {
    DeploymentReportUseCase::new(
        Arc::clone(workspace),
        FileSystemReportStore::new(root),
        config.tier_policy(),
        progress,
    )
}
