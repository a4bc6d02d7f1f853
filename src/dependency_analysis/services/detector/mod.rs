//! Source tree dependency detection
//!
//! The detector walks a scenario's tree, applies the reference patterns and
//! the resource signature catalog to every eligible file, and keeps only
//! names the known catalog vouches for.

mod aliases;
mod catalog;
mod patterns;
mod walker;

pub use aliases::AliasTable;
pub use catalog::{CatalogCache, CatalogLookup, NameCatalog};
pub use patterns::{ReferencePatterns, ResourceSignature, SignatureCatalog, SignaturePattern};
pub use walker::{SkippedEntry, SourceFile, SourceWalker, WalkOutcome};

use crate::dependency_analysis::domain::{
    DependencyKey, DependencyType, DetectedDependency, DetectionEvidence, DetectionMethod,
    ServiceManifest,
};
use crate::dependency_analysis::policies::ResourceKnowledge;
use crate::ports::outbound::CatalogSource;
use crate::shared::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Top-level directories where `resource-<name>` commands count
const RESOURCE_COMMAND_DIRS: &[&str] = &["api", "cli", "lib", "scripts", "initialization"];

/// Result of scanning one scenario tree
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub scenario: String,
    /// One record per `(type, name)`, sorted by type then name
    pub dependencies: Vec<DetectedDependency>,
    pub files_scanned: usize,
    pub skipped: Vec<SkippedEntry>,
}

impl ScanOutcome {
    pub fn of_type(&self, dependency_type: DependencyType) -> impl Iterator<Item = &DetectedDependency> {
        self.dependencies
            .iter()
            .filter(move |d| d.dependency_type == dependency_type)
    }
}

/// Accumulates detections keyed by canonical `(type, name)`
struct Detections<'a> {
    catalog: &'a NameCatalog,
    scenario: String,
    found: BTreeMap<DependencyKey, DetectedDependency>,
}

impl<'a> Detections<'a> {
    fn new(catalog: &'a NameCatalog, scenario: &str) -> Self {
        Self {
            catalog,
            scenario: scenario.to_lowercase(),
            found: BTreeMap::new(),
        }
    }

    fn scenario(&mut self, name: &str, file: &str, method: DetectionMethod, pattern: &str) {
        let name = name.to_lowercase();
        if name == self.scenario || !self.catalog.known_scenario(&name) {
            return;
        }
        self.record(DependencyType::Scenario, name, None, file, method, pattern);
    }

    fn resource(
        &mut self,
        name: &str,
        resource_type: Option<&str>,
        file: &str,
        method: DetectionMethod,
        pattern: &str,
    ) {
        let name = ResourceKnowledge::canonical_name(name);
        if !self.catalog.known_resource(&name) {
            return;
        }
        self.record(
            DependencyType::Resource,
            name,
            resource_type.map(str::to_string),
            file,
            method,
            pattern,
        );
    }

    fn shared_workflow(&mut self, name: &str, file: &str) {
        if !self.catalog.known_shared_workflow(name) {
            return;
        }
        self.record(
            DependencyType::SharedWorkflow,
            name.to_string(),
            None,
            file,
            DetectionMethod::WorkflowReference,
            "shared_workflow",
        );
    }

    fn record(
        &mut self,
        dependency_type: DependencyType,
        name: String,
        resource_type: Option<String>,
        file: &str,
        method: DetectionMethod,
        pattern: &str,
    ) {
        let key = DependencyKey::new(dependency_type, &name);
        let entry = self
            .found
            .entry(key)
            .or_insert_with(|| DetectedDependency::new(name, dependency_type));
        if entry.resource_type.is_none() {
            entry.resource_type = resource_type;
        }
        entry.add_evidence(DetectionEvidence {
            file: file.to_string(),
            method,
            pattern: pattern.to_string(),
        });
    }

    fn into_sorted(self) -> Vec<DetectedDependency> {
        self.found.into_values().collect()
    }
}

/// DependencyDetector infers a scenario's dependencies from its source tree
///
/// Owns its name catalog: built lazily from the `CatalogSource` on first use,
/// rebuilt by [`DependencyDetector::refresh_catalogs`].
pub struct DependencyDetector<C: CatalogSource> {
    catalog: CatalogCache<C>,
    patterns: ReferencePatterns,
    signatures: SignatureCatalog,
    walker: SourceWalker,
}

impl<C: CatalogSource> DependencyDetector<C> {
    pub fn new(source: C) -> Result<Self> {
        Self::with_signatures(source, SignatureCatalog::builtin()?)
    }

    pub fn with_signatures(source: C, signatures: SignatureCatalog) -> Result<Self> {
        Ok(Self {
            catalog: CatalogCache::new(source),
            patterns: ReferencePatterns::new()?,
            signatures,
            walker: SourceWalker::default(),
        })
    }

    pub fn with_walker(mut self, walker: SourceWalker) -> Self {
        self.walker = walker;
        self
    }

    pub fn catalog_source(&self) -> &C {
        self.catalog.source()
    }

    /// Rebuilds the known-name catalog, e.g. after manifests were edited
    pub fn refresh_catalogs(&self) {
        self.catalog.refresh();
    }

    /// Scans `scenario_root` for dependencies of `scenario`.
    ///
    /// Never fails: unreadable files are recorded in [`ScanOutcome::skipped`].
    pub fn scan(&self, scenario: &str, scenario_root: &Path, manifest: &ServiceManifest) -> ScanOutcome {
        let catalog = self.catalog.snapshot();
        let walk = self.walker.walk(scenario_root);
        let mut skipped = walk.skipped;

        let mut sources = Vec::with_capacity(walk.files.len());
        for file in walk.files {
            match fs::read_to_string(&file.path) {
                Ok(content) => sources.push((file, content)),
                Err(e) => {
                    debug!(path = %file.relative, error = %e, "skipping unreadable file");
                    skipped.push(SkippedEntry {
                        path: file.relative,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let aliases = AliasTable::build(
            &self.patterns.alias_assignment,
            sources.iter().map(|(_, content)| content.as_str()),
        );
        debug!(scenario, aliases = aliases.len(), "built alias table");

        let mut detections = Detections::new(&catalog, scenario);
        for (file, content) in &sources {
            self.scan_scenario_references(&mut detections, file, content, &aliases);
            self.scan_resources(&mut detections, file, content);
            self.scan_shared_workflows(&mut detections, file, content);
        }
        Self::fold_initialization(&mut detections, manifest);

        let dependencies = detections.into_sorted();
        info!(
            scenario,
            files = sources.len(),
            detected = dependencies.len(),
            skipped = skipped.len(),
            "scan complete"
        );

        ScanOutcome {
            scenario: scenario.to_string(),
            dependencies,
            files_scanned: sources.len(),
            skipped,
        }
    }

    fn scan_scenario_references(
        &self,
        detections: &mut Detections<'_>,
        file: &SourceFile,
        content: &str,
        aliases: &AliasTable,
    ) {
        for caps in self.patterns.scenario_command.captures_iter(content) {
            detections.scenario(
                &caps[1],
                &file.relative,
                DetectionMethod::ScenarioCommand,
                "vrooli scenario",
            );
        }

        for caps in self.patterns.cli_invocation.captures_iter(content) {
            detections.scenario(
                &caps[1],
                &file.relative,
                DetectionMethod::CliInvocation,
                "scenario-cli",
            );
        }

        for caps in self.patterns.port_resolution.captures_iter(content) {
            let literal = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
            let resolved = match literal {
                Some(name) => Some(name),
                None => caps.get(3).and_then(|ident| aliases.resolve(ident.as_str())),
            };
            if let Some(name) = resolved {
                detections.scenario(
                    name,
                    &file.relative,
                    DetectionMethod::PortResolution,
                    "resolveScenarioPortViaCLI",
                );
            }
        }
    }

    fn scan_resources(&self, detections: &mut Detections<'_>, file: &SourceFile, content: &str) {
        if RESOURCE_COMMAND_DIRS.contains(&file.top_level_dir()) {
            for caps in self.patterns.resource_command.captures_iter(content) {
                detections.resource(
                    &caps[1],
                    None,
                    &file.relative,
                    DetectionMethod::ResourceCommand,
                    "resource-command",
                );
            }
        }

        for (signature, pattern) in self.signatures.matches(content) {
            detections.resource(
                &signature.name,
                Some(&signature.resource_type),
                &file.relative,
                DetectionMethod::Signature,
                &pattern.name,
            );
        }
    }

    fn scan_shared_workflows(&self, detections: &mut Detections<'_>, file: &SourceFile, content: &str) {
        for caps in self.patterns.shared_workflow.captures_iter(content) {
            detections.shared_workflow(&caps[1], &file.relative);
        }
    }

    fn fold_initialization(detections: &mut Detections<'_>, manifest: &ServiceManifest) {
        for (name, declaration) in manifest.enabled_resources() {
            for step in &declaration.initialization {
                if let Some(file) = step.file() {
                    detections.resource(
                        name,
                        declaration.resource_type.as_deref(),
                        file,
                        DetectionMethod::Initialization,
                        "initialization",
                    );
                }
            }
        }
    }
}

impl<C: CatalogSource> CatalogLookup for DependencyDetector<C> {
    fn known_scenario(&self, name: &str) -> bool {
        self.catalog.snapshot().known_scenario(name)
    }

    fn known_resource(&self, name: &str) -> bool {
        self.catalog.snapshot().known_resource(name)
    }

    fn known_shared_workflow(&self, name: &str) -> bool {
        self.catalog.snapshot().known_shared_workflow(name)
    }
}
