use clap::{Parser, Subcommand};
use std::path::PathBuf;

use scenario_deps::application::dto::OutputFormat;
use scenario_deps::dependency_analysis::domain::GraphType;

/// Detect, reconcile and plan the dependencies of platform scenarios
#[derive(Parser, Debug)]
#[command(name = "scenario-deps")]
#[command(version)]
#[command(about = "Detect, reconcile and plan the dependencies of platform scenarios", long_about = None)]
pub struct Args {
    /// Directory holding one sub-directory per scenario (defaults to the config value, then ".")
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Path to a config file (defaults to ./scenario-deps.config.yml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dependency store file (defaults to <root>/.scenario-deps.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Output format: json or markdown
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Verbose logging (repeat for more: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Scan one scenario and compare what it uses with what it declares
    Analyze {
        scenario: String,

        /// Declare detected dependencies that are missing from the manifest
        #[arg(long)]
        apply: bool,
    },

    /// Analyze every scenario in the workspace
    AnalyzeAll,

    /// Build the cross-scenario dependency graph from stored edges
    Graph {
        /// Graph type: resource, scenario, shared_workflow or combined
        #[arg(short = 't', long = "type", default_value = "combined")]
        graph_type: GraphType,
    },

    /// Detect scenario-to-scenario dependency cycles
    Cycles,

    /// Show what breaks if a dependency is removed
    Impact { dependency: String },

    /// Recommend declaration, enablement and tier-swap changes
    Optimize {
        scenario: String,

        /// Write declarations and disable unused optional resources
        #[arg(long)]
        apply: bool,
    },

    /// Per-tier deployment report (cached next to the manifest)
    Deployment {
        scenario: String,

        /// Rebuild even when the cached report is fresh
        #[arg(long)]
        refresh: bool,
    },

    /// Deployable bundle skeleton for one tier
    Bundle {
        scenario: String,

        /// Target tier (defaults to the first analyzed tier)
        #[arg(short, long)]
        tier: Option<String>,

        /// Write the skeleton to <scenario>/.vrooli/bundle.json
        #[arg(long)]
        write: bool,
    },
}

impl Args {
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
