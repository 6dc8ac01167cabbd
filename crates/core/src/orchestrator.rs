//! Drives the whole stub pipeline for one installation.
//!
//! Order of work:
//! 1. Probe the stub tool (the only fatal precondition).
//! 2. Scan the library directory once and index wrappers once for every
//!    compiled module, before any synthesis starts.
//! 3. Process the core module, then registry extensions in registry order, then
//!    any remaining compiled modules. Each module is handled at most once.
//! 4. Remove the scratch namespace tree left behind by wrapper synthesis.

use crate::aggregate::SubmoduleAggregator;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::library::LibraryScanner;
use crate::registry::{PackageTreeRegistry, StaticRegistry};
use crate::relocate::{ArtifactMerger, Relocator};
use crate::synth::StubSynthesizer;
use crate::wrapper::{IndexOutcome, WrapperIndexer};
use indexmap::IndexSet;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use stubweave_api::{CompiledModule, ExtensionRegistry, ModuleOutcome, RunReport, StubTool};
use tracing::{debug, info, info_span, warn};

pub struct Orchestrator {
    config: PipelineConfig,
    scanner: LibraryScanner,
    indexer: WrapperIndexer,
    synthesizer: StubSynthesizer,
    aggregator: SubmoduleAggregator,
    merger: ArtifactMerger,
    relocator: Relocator,
    registry: Box<dyn ExtensionRegistry>,
}

impl Orchestrator {
    pub fn new(
        config: PipelineConfig,
        tool: Arc<dyn StubTool>,
        registry: Box<dyn ExtensionRegistry>,
    ) -> Self {
        Self {
            scanner: LibraryScanner::new(config.platform_tag.clone()),
            indexer: WrapperIndexer::from_config(&config),
            synthesizer: StubSynthesizer::from_config(tool, &config),
            aggregator: SubmoduleAggregator::from_config(&config),
            merger: ArtifactMerger::from_config(&config),
            relocator: Relocator::from_config(&config),
            registry,
            config,
        }
    }

    /// Orchestrator with the registry implied by the configuration: the explicit
    /// extension list if one was given, otherwise the package tree.
    pub fn with_default_registry(config: PipelineConfig, tool: Arc<dyn StubTool>) -> Self {
        let registry: Box<dyn ExtensionRegistry> = match &config.extensions {
            Some(extensions) => Box::new(StaticRegistry::new(extensions.clone())),
            None => Box::new(PackageTreeRegistry::from_config(&config)),
        };
        Self::new(config, tool, registry)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self) -> Result<RunReport> {
        let _span = info_span!(
            "generate",
            installation = %self.config.installation_root.display()
        )
        .entered();

        self.synthesizer.ensure_available()?;

        info!(
            "Generating stub files for {}",
            self.config.installation_root.display()
        );

        let mut report = RunReport::default();
        let compiled = self.scanner.scan(&self.config.library_dir())?;
        if compiled.is_empty() {
            info!("No compiled modules found, nothing to generate");
            return Ok(report);
        }

        let index = self
            .indexer
            .index(compiled.iter().map(|module| module.name().to_string()))?;
        report.unmatched = index.unmatched.clone();

        let order = self.processing_order(&compiled, &mut report);
        let mut processed: HashSet<String> = HashSet::new();

        for name in order {
            if !processed.insert(name.clone()) {
                debug!("{} already processed", name);
                continue;
            }
            let outcome = self.process_module(&name, &index);
            report.record(name, outcome);
        }

        self.cleanup()?;

        info!(
            "Processed {} modules ({} failed, {} without source hints)",
            report.processed.len(),
            report.failures(),
            report.unmatched.len()
        );
        Ok(report)
    }

    /// Core module, then registry extensions, then leftovers in listing order.
    fn processing_order(
        &self,
        compiled: &IndexSet<CompiledModule>,
        report: &mut RunReport,
    ) -> Vec<String> {
        let installed = |name: &str| compiled.contains(&CompiledModule::new(name));
        let mut order = Vec::with_capacity(compiled.len());

        if installed(&self.config.core_module) {
            order.push(self.config.core_module.clone());
        } else {
            warn!(
                "Core module {} not found in {}",
                self.config.core_module,
                self.config.library_dir().display()
            );
        }

        match self.registry.extensions() {
            Ok(extensions) => {
                debug!(
                    "Registry {} reported {} extensions",
                    self.registry.name(),
                    extensions.len()
                );
                for extension in extensions {
                    let module = self.config.extension_module_name(&extension);
                    if installed(&module) {
                        order.push(module);
                    } else {
                        warn!("Extension {} has no compiled module {}", extension, module);
                        report.skipped_extensions.push(extension);
                    }
                }
            }
            Err(e) => warn!("Failed to list extensions from {}: {}", self.registry.name(), e),
        }

        order.extend(compiled.iter().map(|module| module.name().to_string()));
        order
    }

    /// Synthesize, aggregate, merge and relocate one module. Failures are
    /// reported in the outcome and never stop the run.
    fn process_module(&self, name: &str, index: &IndexOutcome) -> ModuleOutcome {
        info!("Generating stubs for {}", name);
        match self.try_process_module(name, index) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Failed to generate stubs for {}: {}", name, e);
                ModuleOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn try_process_module(&self, name: &str, index: &IndexOutcome) -> Result<ModuleOutcome> {
        let artifact = self.synthesizer.synthesize_binary(name)?;
        if artifact.is_directory() {
            self.aggregator.aggregate(&artifact.root_path)?;
        }

        let Some(wrapper) = index.wrapper_for(name) else {
            warn!(
                "No source import module found for binary module {}. Source hints may not work for this binary.",
                name
            );
            return Ok(ModuleOutcome::BinaryOnly {
                location: Some(artifact.root_path),
            });
        };

        let wrapper_stub = match self
            .synthesizer
            .synthesize_wrapper(&wrapper.dotted_path, wrapper.kind)
        {
            Ok(path) => path,
            Err(e) => {
                warn!(
                    "Failed to generate stubs for wrapper {} of {}: {}",
                    wrapper.dotted_path, name, e
                );
                return Ok(ModuleOutcome::BinaryOnly {
                    location: Some(artifact.root_path),
                });
            }
        };

        self.merger.merge(&artifact, &wrapper_stub)?;
        let plan = self.relocator.relocate(&artifact, wrapper)?;

        Ok(ModuleOutcome::Relocated {
            destination: plan.destination().to_path_buf(),
            case: plan.case(),
        })
    }

    /// Remove `<scratch>/<package>` left behind by wrapper synthesis.
    fn cleanup(&self) -> Result<()> {
        let leftover = self.config.scratch_dir().join(&self.config.package_name);
        if leftover == self.config.source_root() || !leftover.is_dir() {
            return Ok(());
        }

        if fs::read_dir(&leftover)?.next().is_some() {
            debug!("Removing non-empty scratch tree {}", leftover.display());
        }
        fs::remove_dir_all(&leftover)?;
        info!("Removed scratch directory {}", leftover.display());
        Ok(())
    }
}
