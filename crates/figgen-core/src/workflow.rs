//! The closed generation loop
//!
//! Stage order for a run: style retrieval (optional) → reference image →
//! icon assets → initial synthesis with runtime debugging → actor-critic
//! rounds. The asset stage and every individual round are tolerant: their
//! failures log, keep the previous state, and let the run continue. The
//! reference image and the initial synthesis are indispensable and abort
//! the run when they fail.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use figgen_assets::{slice_sheet, AssetRegistry, IconFactory};
use figgen_coder::{Coder, Critic};
use figgen_model::{ModelBackend, ModelConfig};
use figgen_render::{DocumentRenderer, CONVENTION_FILENAME};
use figgen_retrieval::VisualResearcher;

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::task::{StageNames, TaskRun};

/// Result of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Directory holding every artifact of the run
    pub run_dir: PathBuf,
    /// Raster preview of the last successfully rendered code
    pub final_raster: PathBuf,
    /// Actor-critic rounds that produced a working revision
    pub rounds_completed: usize,
    /// Human-readable outcome
    pub message: String,
}

/// Accumulated state after a successful debug loop
struct StageOutcome {
    code: String,
    raster: PathBuf,
}

/// Orchestrates one requirement end to end
pub struct WorkflowManager<B, R> {
    coder: Coder<B>,
    critic: Critic<B>,
    factory: IconFactory<B>,
    renderer: R,
    researcher: Option<VisualResearcher<B>>,
    config: WorkflowConfig,
}

impl<B, R> WorkflowManager<B, R>
where
    B: ModelBackend,
    R: DocumentRenderer,
{
    /// Wire the pipeline over one backend and one renderer
    pub fn new(backend: Arc<B>, renderer: R, models: ModelConfig, config: WorkflowConfig) -> Self {
        Self {
            coder: Coder::new(Arc::clone(&backend), models.clone()),
            critic: Critic::new(Arc::clone(&backend), models.clone()),
            factory: IconFactory::new(backend),
            renderer,
            researcher: None,
            config,
        }
    }

    /// Attach a retrieval module
    #[must_use]
    pub fn with_researcher(mut self, researcher: VisualResearcher<B>) -> Self {
        self.researcher = Some(researcher);
        self
    }

    /// Execute the full workflow for one requirement
    ///
    /// `output_dir` pins the run directory; otherwise a timestamped one is
    /// created under the configured output root. Partial artifacts stay on
    /// disk whatever happens.
    pub async fn run(
        &self,
        requirement: &str,
        output_dir: Option<&Path>,
    ) -> Result<RunSummary, WorkflowError> {
        let run = match output_dir {
            Some(dir) => TaskRun::at(dir)?,
            None => TaskRun::create_timestamped(&self.config.output_root)?,
        };
        info!(dir = %run.dir().display(), requirement, "task started");

        self.stage_toolkit(&run).await;
        run.save_text("requirement.txt", requirement).await?;

        // Optional style retrieval, biasing the reference prompt.
        let style_hints = self.retrieve_style(requirement, &run).await;

        let Some(reference) = self
            .coder
            .generate_reference(requirement, style_hints.as_deref(), run.dir())
            .await
        else {
            return Err(WorkflowError::Reference);
        };

        let assets = self.prepare_assets(&reference, &run).await;

        // Initial synthesis plus runtime debugging.
        let code = self
            .coder
            .synthesize(
                Some(reference.as_path()),
                requirement,
                &assets,
                self.config.canvas_cm,
                CONVENTION_FILENAME,
            )
            .await?;
        let Some(initial) = self
            .generate_and_debug_loop(code, &run, &TaskRun::init_prefix())
            .await?
        else {
            return Err(WorkflowError::InitialCodeFailed {
                attempts: self.config.max_retries + 1,
            });
        };

        let mut current_code = initial.code;
        let mut current_raster = initial.raster;
        let mut rounds_completed = 0;

        for round in 1..=self.config.max_iterations {
            info!(round, "critic reviewing current render");
            let critique = match self
                .critic
                .critique(&current_raster, Some(reference.as_path()))
                .await
            {
                Ok(text) => text,
                Err(err) => {
                    warn!(round, error = %err, "critique failed, keeping previous round");
                    continue;
                }
            };
            run.save_text(&TaskRun::critique_filename(round), &critique)
                .await?;

            info!(round, "actor applying critique");
            let revised = match self
                .coder
                .revise_with_critique(
                    &current_code,
                    &critique,
                    &current_raster,
                    Some(reference.as_path()),
                    &assets,
                )
                .await
            {
                Ok(code) => code,
                Err(err) => {
                    warn!(round, error = %err, "revision failed, keeping previous round");
                    continue;
                }
            };

            match self
                .generate_and_debug_loop(revised, &run, &TaskRun::stage_prefix(round))
                .await?
            {
                Some(outcome) => {
                    info!(round, "round succeeded");
                    current_code = outcome.code;
                    current_raster = outcome.raster;
                    rounds_completed += 1;
                }
                None => {
                    warn!(round, "revised code never ran, keeping previous round");
                }
            }
        }

        info!(dir = %run.dir().display(), rounds_completed, "task completed");
        Ok(RunSummary {
            run_dir: run.dir().to_path_buf(),
            final_raster: current_raster,
            rounds_completed,
            message: "Success".to_string(),
        })
    }

    /// Render `code`, repairing runtime failures up to the retry budget
    ///
    /// Environment-class render failures (converter or rasterizer missing,
    /// I/O) propagate immediately: no code edit can fix them. Code-class
    /// failures write `{prefix}_error_log_try_{k}.txt` and feed the repair
    /// prompt. `None` means the budget ran out.
    async fn generate_and_debug_loop(
        &self,
        mut code: String,
        run: &TaskRun,
        prefix: &str,
    ) -> Result<Option<StageOutcome>, WorkflowError> {
        let names = StageNames::new(prefix);
        run.save_text(&names.draft(), &code).await?;

        for attempt in 0..=self.config.max_retries {
            info!(prefix, attempt, max = self.config.max_retries, "executing code");
            match self
                .renderer
                .render(&code, run.dir(), &names.attempt(attempt))
                .await
            {
                Ok(rendered) => {
                    info!(prefix, raster = %rendered.raster.display(), "execution succeeded");
                    run.save_text(&names.final_code(), &code).await?;
                    return Ok(Some(StageOutcome {
                        code,
                        raster: rendered.raster,
                    }));
                }
                Err(err) if err.is_code_error() => {
                    let log = err.to_string();
                    warn!(prefix, attempt, error = %log, "execution failed");
                    run.save_text(&names.error_log(attempt), &log).await?;
                    if attempt < self.config.max_retries {
                        code = self.coder.repair(&code, &log).await?;
                        run.save_text(&names.fix(attempt), &code).await?;
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
        warn!(prefix, "retry budget exhausted, giving up on this stage");
        Ok(None)
    }

    /// Copy the configured drawing toolkit next to the generated scripts
    async fn stage_toolkit(&self, run: &TaskRun) {
        let Some(src) = &self.config.toolkit_path else {
            return;
        };
        if let Err(err) = tokio::fs::copy(src, run.path("tools.py")).await {
            warn!(src = %src.display(), error = %err, "drawing toolkit not staged");
        }
    }

    /// Retrieve references and distill a style guide; fully advisory
    async fn retrieve_style(&self, requirement: &str, run: &TaskRun) -> Option<String> {
        if !self.config.retrieval_enabled {
            return None;
        }
        let researcher = self.researcher.as_ref()?;
        let hits = match researcher.search(requirement, None).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(error = %err, "retrieval failed, continuing without style guide");
                return None;
            }
        };
        if hits.is_empty() {
            return None;
        }
        let guide = researcher.extract_design_style(&hits).await;
        let json = guide.to_json();
        if let Err(err) = run.save_text("style_guide.json", &json).await {
            warn!(error = %err, "style guide not persisted");
        }
        Some(json)
    }

    /// Plan, compose, and slice icon assets for the reference figure
    ///
    /// Every failure in this stage degrades to an empty registry; the
    /// figure is then drawn entirely with native shapes.
    async fn prepare_assets(&self, reference: &Path, run: &TaskRun) -> AssetRegistry {
        let plans = self.coder.plan_icons(reference).await;
        if plans.is_empty() {
            info!("no icon assets planned");
            return AssetRegistry::new();
        }
        info!(count = plans.len(), "icon subjects planned");

        let descriptions = self.coder.describe_icons(reference, &plans).await;
        if descriptions.is_empty() {
            return AssetRegistry::new();
        }
        let Some(sheet) = self
            .factory
            .generate_grid_sheet(&descriptions, run.dir())
            .await
        else {
            return AssetRegistry::new();
        };
        match slice_sheet(&sheet, &plans, run.dir()) {
            Ok(registry) => {
                info!(count = registry.len(), "icon assets ready");
                registry
            }
            Err(err) => {
                warn!(error = %err, "sheet slicing failed, continuing without assets");
                AssetRegistry::new()
            }
        }
    }
}
