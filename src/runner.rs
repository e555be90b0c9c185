//! Batch orchestration as an explicit state machine.
//!
//! ```text
//! Init ──► LocateBase ──► EnumerateOverlays ──► CompositeLoop ──► Done
//!   │          │                 │                    │
//!   └──────────┴─────────────────┴────────────────────┴──► Failed
//! ```
//!
//! Each call to [`BatchRunner::step`] executes exactly one stage, so every
//! failure mode can be exercised on its own. [`BatchRunner::run`] steps until
//! the run is done or the first error.
//!
//! Every error is fatal. Outputs written before a failure stay on disk.
//!
//! Progress is delivered as [`RunEvent`]s to a caller-supplied callback;
//! the runner never prints. See [`output`](crate::output) for formatting.

use crate::config::RunConfig;
use crate::imaging::{BackendError, ImageBackend, composite};
use crate::scan::{self, BaseImage, OverlaySequence, ScanError};
use image::RgbaImage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Missing folder: {0}")]
    MissingDirectory(PathBuf),
    #[error("No base image found in {0} (drop your base file there, e.g. ff1pr0.png)")]
    NoBaseImage(PathBuf),
    #[error("No overlay images found in: {0}")]
    NoOverlaysFound(PathBuf),
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Progress notifications emitted while running.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// One output written. `index` is 1-based.
    Generated {
        index: usize,
        total: usize,
        output_name: String,
    },
    Completed(RunSummary),
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// File name of the base image used.
    pub base_name: String,
    pub output_dir: PathBuf,
    /// Written files, in overlay order.
    pub outputs: Vec<PathBuf>,
}

/// Decoded base image plus its naming information.
#[derive(Debug, Clone)]
pub struct LoadedBase {
    pub info: BaseImage,
    pub image: RgbaImage,
}

/// Current state. Each variant names the stage that runs on the next step
/// and carries what earlier stages produced.
#[derive(Debug)]
pub enum Stage {
    Init,
    LocateBase,
    EnumerateOverlays(LoadedBase),
    CompositeLoop(LoadedBase, OverlaySequence),
    Done(RunSummary),
    Failed,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::LocateBase => "locate-base",
            Stage::EnumerateOverlays(..) => "enumerate-overlays",
            Stage::CompositeLoop(..) => "composite-loop",
            Stage::Done(_) => "done",
            Stage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done(_) | Stage::Failed)
    }
}

/// Drives one batch run against a [`RunConfig`] and an [`ImageBackend`].
pub struct BatchRunner<'a, B: ImageBackend> {
    config: &'a RunConfig,
    backend: &'a B,
    stage: Stage,
}

impl<'a, B: ImageBackend> BatchRunner<'a, B> {
    pub fn new(config: &'a RunConfig, backend: &'a B) -> Self {
        Self {
            config,
            backend,
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Run the current stage and advance.
    ///
    /// On error the runner moves to [`Stage::Failed`]. Stepping a runner
    /// that is already done or failed does nothing.
    pub fn step(&mut self, on_event: &mut impl FnMut(&RunEvent)) -> Result<(), RunError> {
        let current = std::mem::replace(&mut self.stage, Stage::Failed);
        tracing::debug!(stage = current.name(), "step");
        let next = match current {
            Stage::Init => self.check_directories().map(|()| Stage::LocateBase),
            Stage::LocateBase => self.locate_base().map(Stage::EnumerateOverlays),
            Stage::EnumerateOverlays(base) => self
                .enumerate_overlays()
                .map(|overlays| Stage::CompositeLoop(base, overlays)),
            Stage::CompositeLoop(base, overlays) => self
                .composite_all(&base, &overlays, on_event)
                .map(Stage::Done),
            terminal @ (Stage::Done(_) | Stage::Failed) => Ok(terminal),
        };

        match next {
            Ok(stage) => {
                self.stage = stage;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "run failed");
                Err(e)
            }
        }
    }

    /// Step until done; returns the summary or the first error.
    pub fn run(mut self, mut on_event: impl FnMut(&RunEvent)) -> Result<RunSummary, RunError> {
        while !self.stage.is_terminal() {
            self.step(&mut on_event)?;
        }
        match self.stage {
            Stage::Done(summary) => Ok(summary),
            _ => unreachable!("loop exits only on Done or by returning an error"),
        }
    }

    fn check_directories(&self) -> Result<(), RunError> {
        let overlays = self.config.overlays_path();
        if !overlays.is_dir() {
            return Err(RunError::MissingDirectory(overlays));
        }
        Ok(())
    }

    fn locate_base(&self) -> Result<LoadedBase, RunError> {
        let info = scan::find_base_image(self.config)?
            .ok_or_else(|| RunError::NoBaseImage(self.config.root.clone()))?;
        tracing::info!(base = %info.file_name, "base image selected");

        let image = self
            .backend
            .load_rgba(&info.path)
            .map_err(|source| RunError::Decode {
                path: info.path.clone(),
                source,
            })?;
        Ok(LoadedBase { info, image })
    }

    fn enumerate_overlays(&self) -> Result<OverlaySequence, RunError> {
        let paths = scan::list_overlays(self.config)?;
        let overlays = OverlaySequence::new(paths)
            .ok_or_else(|| RunError::NoOverlaysFound(self.config.overlays_path()))?;
        tracing::info!(count = overlays.len(), "overlays found");
        Ok(overlays)
    }

    fn composite_all(
        &self,
        base: &LoadedBase,
        overlays: &OverlaySequence,
        on_event: &mut impl FnMut(&RunEvent),
    ) -> Result<RunSummary, RunError> {
        let output_dir = self.config.output_path();
        std::fs::create_dir_all(&output_dir).map_err(|e| RunError::Write {
            path: output_dir.clone(),
            source: BackendError::Io(e),
        })?;

        let total = overlays.len();
        let mut outputs = Vec::with_capacity(total);

        for (index, overlay_path) in (1..).zip(overlays.paths()) {
            let overlay = self
                .backend
                .load_rgba(overlay_path)
                .map_err(|source| RunError::Decode {
                    path: overlay_path.clone(),
                    source,
                })?;

            let result = composite(&base.image, &overlay);
            drop(overlay);

            let output_name = base.info.stem.output_name(index as u64);
            let output_path = output_dir.join(&output_name);
            self.backend
                .save_png(&result, &output_path)
                .map_err(|source| RunError::Write {
                    path: output_path.clone(),
                    source,
                })?;

            tracing::debug!(overlay = %overlay_path.display(), output = %output_name, "composited");
            on_event(&RunEvent::Generated {
                index,
                total,
                output_name,
            });
            outputs.push(output_path);
        }

        let summary = RunSummary {
            base_name: base.info.file_name.clone(),
            output_dir,
            outputs,
        };
        on_event(&RunEvent::Completed(summary.clone()));
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::{solid, touch};
    use image::Rgba;
    use std::fs;
    use tempfile::TempDir;

    /// Root with a base file and an overlays dir holding `overlays`.
    /// Files are empty; the mock backend serves pixels by file name.
    fn layout(base: &str, overlays: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), &[base]);
        let dir = tmp.path().join("Overlays");
        fs::create_dir(&dir).unwrap();
        touch(&dir, overlays);
        tmp
    }

    fn mock_for(base: &str, overlays: &[&str]) -> MockBackend {
        let mut backend = MockBackend::new().with_image(base, solid(4, 4, [0, 0, 255, 255]));
        for name in overlays {
            backend = backend.with_image(name, solid(4, 4, [255, 0, 0, 255]));
        }
        backend
    }

    fn no_events() -> impl FnMut(&RunEvent) {
        |_| {}
    }

    // =========================================================================
    // Single stages
    // =========================================================================

    #[test]
    fn init_fails_without_overlay_dir_and_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), &["x5.png"]);
        let config = RunConfig::new(tmp.path());
        let backend = MockBackend::new();
        let mut runner = BatchRunner::new(&config, &backend);

        let err = runner.step(&mut no_events()).unwrap_err();

        assert!(matches!(err, RunError::MissingDirectory(p) if p.ends_with("Overlays")));
        assert!(matches!(runner.stage(), Stage::Failed));
        assert!(backend.get_operations().is_empty());
        assert!(!tmp.path().join("Finished").exists());
    }

    #[test]
    fn init_advances_to_locate_base() {
        let tmp = layout("x5.png", &[]);
        let config = RunConfig::new(tmp.path());
        let backend = MockBackend::new();
        let mut runner = BatchRunner::new(&config, &backend);

        runner.step(&mut no_events()).unwrap();
        assert!(matches!(runner.stage(), Stage::LocateBase));
    }

    #[test]
    fn locate_base_fails_when_root_has_no_image() {
        let tmp = layout("readme.txt", &["a.png"]);
        let config = RunConfig::new(tmp.path());
        let backend = MockBackend::new();
        let mut runner = BatchRunner::new(&config, &backend);

        runner.step(&mut no_events()).unwrap();
        let err = runner.step(&mut no_events()).unwrap_err();

        assert!(matches!(err, RunError::NoBaseImage(_)));
        assert!(matches!(runner.stage(), Stage::Failed));
    }

    #[test]
    fn locate_base_fails_on_corrupt_base() {
        let tmp = layout("x5.png", &["a.png"]);
        let config = RunConfig::new(tmp.path());
        let backend = mock_for("x5.png", &["a.png"]).with_corrupt("x5.png");
        let mut runner = BatchRunner::new(&config, &backend);

        runner.step(&mut no_events()).unwrap();
        let err = runner.step(&mut no_events()).unwrap_err();

        assert!(matches!(err, RunError::Decode { path, .. } if path.ends_with("x5.png")));
    }

    #[test]
    fn locate_base_decodes_and_decomposes_stem() {
        let tmp = layout("x5.png", &["a.png"]);
        let config = RunConfig::new(tmp.path());
        let backend = mock_for("x5.png", &["a.png"]);
        let mut runner = BatchRunner::new(&config, &backend);

        runner.step(&mut no_events()).unwrap();
        runner.step(&mut no_events()).unwrap();

        match runner.stage() {
            Stage::EnumerateOverlays(base) => {
                assert_eq!(base.info.file_name, "x5.png");
                assert_eq!(base.info.stem.prefix, "x");
                assert_eq!(base.info.stem.start_offset().to_string(), "5");
                assert_eq!(base.image.dimensions(), (4, 4));
            }
            other => panic!("unexpected stage {}", other.name()),
        }
    }

    #[test]
    fn enumerate_fails_on_empty_overlay_dir() {
        let tmp = layout("x5.png", &["notes.txt"]);
        let config = RunConfig::new(tmp.path());
        let backend = mock_for("x5.png", &[]);
        let mut runner = BatchRunner::new(&config, &backend);

        runner.step(&mut no_events()).unwrap();
        runner.step(&mut no_events()).unwrap();
        let err = runner.step(&mut no_events()).unwrap_err();

        assert!(matches!(err, RunError::NoOverlaysFound(p) if p.ends_with("Overlays")));
        assert!(!tmp.path().join("Finished").exists());
    }

    #[test]
    fn stepping_terminal_stage_is_noop() {
        let tmp = TempDir::new().unwrap();
        let config = RunConfig::new(tmp.path());
        let backend = MockBackend::new();
        let mut runner = BatchRunner::new(&config, &backend);

        assert!(runner.step(&mut no_events()).is_err());
        assert!(runner.step(&mut no_events()).is_ok());
        assert!(matches!(runner.stage(), Stage::Failed));
    }

    // =========================================================================
    // Composite loop
    // =========================================================================

    #[test]
    fn outputs_numbered_from_base_stem() {
        let tmp = layout("ff1pr0.png", &["o10.png", "o2.png", "o1.png"]);
        let config = RunConfig::new(tmp.path());
        let backend = mock_for("ff1pr0.png", &["o10.png", "o2.png", "o1.png"]);

        let summary = BatchRunner::new(&config, &backend)
            .run(no_events())
            .unwrap();

        assert_eq!(
            backend.saved_names(),
            ["ff1pr1.png", "ff1pr2.png", "ff1pr3.png"]
        );
        assert_eq!(summary.base_name, "ff1pr0.png");
        assert_eq!(summary.outputs.len(), 3);
        assert!(tmp.path().join("Finished").is_dir());
    }

    #[test]
    fn overlays_processed_in_natural_order() {
        let tmp = layout("cover.png", &["o10.png", "o2.png", "o1.png"]);
        let config = RunConfig::new(tmp.path());
        let backend = mock_for("cover.png", &["o10.png", "o2.png", "o1.png"]);

        BatchRunner::new(&config, &backend)
            .run(no_events())
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            [
                RecordedOp::Load("cover.png".into()),
                RecordedOp::Load("o1.png".into()),
                RecordedOp::Save("cover1.png".into()),
                RecordedOp::Load("o2.png".into()),
                RecordedOp::Save("cover2.png".into()),
                RecordedOp::Load("o10.png".into()),
                RecordedOp::Save("cover3.png".into()),
            ]
        );
    }

    #[test]
    fn saved_images_are_composites() {
        let tmp = layout("b.png", &["half.png"]);
        let config = RunConfig::new(tmp.path());
        let backend = MockBackend::new()
            .with_image("b.png", solid(6, 4, [0, 0, 0, 255]))
            .with_image("half.png", solid(3, 2, [255, 255, 255, 0]));

        BatchRunner::new(&config, &backend)
            .run(no_events())
            .unwrap();

        let saved = backend.saved.borrow();
        let (name, image) = &saved[0];
        assert_eq!(name, "b1.png");
        assert_eq!(image.dimensions(), (6, 4));
        assert!(image.pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn events_report_progress_then_completion() {
        let tmp = layout("x5.png", &["a.png", "b.png"]);
        let config = RunConfig::new(tmp.path());
        let backend = mock_for("x5.png", &["a.png", "b.png"]);
        let mut events = Vec::new();

        BatchRunner::new(&config, &backend)
            .run(|e| events.push(e.clone()))
            .unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            RunEvent::Generated {
                index: 1,
                total: 2,
                output_name: "x6.png".into()
            }
        );
        assert_eq!(
            events[1],
            RunEvent::Generated {
                index: 2,
                total: 2,
                output_name: "x7.png".into()
            }
        );
        assert!(matches!(&events[2], RunEvent::Completed(s) if s.base_name == "x5.png"));
    }

    #[test]
    fn corrupt_overlay_aborts_after_earlier_outputs() {
        let tmp = layout("x0.png", &["1.png", "2.png", "3.png"]);
        let config = RunConfig::new(tmp.path());
        let backend = mock_for("x0.png", &["1.png", "2.png", "3.png"]).with_corrupt("2.png");
        let mut events = Vec::new();

        let err = BatchRunner::new(&config, &backend)
            .run(|e| events.push(e.clone()))
            .unwrap_err();

        assert!(matches!(err, RunError::Decode { path, .. } if path.ends_with("2.png")));
        assert_eq!(backend.saved_names(), ["x1.png"]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn custom_directory_names_respected() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), &["p1.png"]);
        fs::create_dir(tmp.path().join("Layers")).unwrap();
        touch(&tmp.path().join("Layers"), &["l.png"]);
        let mut config = RunConfig::new(tmp.path());
        config.overlays_dir = "Layers".into();
        config.output_dir = "Out".into();
        let backend = mock_for("p1.png", &["l.png"]);

        let summary = BatchRunner::new(&config, &backend)
            .run(no_events())
            .unwrap();

        assert_eq!(summary.output_dir, tmp.path().join("Out"));
        assert_eq!(summary.outputs, [tmp.path().join("Out").join("p2.png")]);
    }
}
