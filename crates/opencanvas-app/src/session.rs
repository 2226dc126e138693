//! Scripted editing sessions.

use kurbo::Point;
use opencanvas_core::config::{ConfigError, EditorConfig};
use opencanvas_core::editor::{Editor, EditorEvent};
use opencanvas_core::input::{KeyEvent, Modifiers};
use opencanvas_core::properties::{EditOutcome, PropertyError};
use opencanvas_core::shapes::SerializableColor;
use opencanvas_core::surface::{ExportFormat, SurfaceError};
use opencanvas_core::tools::ToolKind;
use opencanvas_render::RasterSurface;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid session script: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// A property value as written in a script: `"#ff0000"` or `4`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StepValue {
    Text(String),
    Number(f64),
}

impl StepValue {
    /// The raw form value, as a text input would hold it.
    pub fn as_form_value(&self) -> String {
        match self {
            StepValue::Text(text) => text.clone(),
            StepValue::Number(n) => n.to_string(),
        }
    }
}

/// One user action in a session script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum SessionStep {
    /// Pick a tool from the toolbar.
    Tool { tool: ToolKind },
    /// Press the pointer on the canvas.
    Click { x: f64, y: f64 },
    /// Press a key.
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        text_input_focused: bool,
    },
    /// Edit a field of the properties panel.
    Set { property: String, value: StepValue },
    Duplicate,
    Delete,
    Clear,
    Resize { width: f64, height: f64 },
    Background { color: String },
    /// Export the canvas to a file.
    Export { format: ExportFormat, path: PathBuf },
}

/// Counts of replayed steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub applied: usize,
    pub failed: usize,
}

/// An editor driven by a script.
pub struct Session {
    editor: Editor<RasterSurface>,
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            editor: Editor::new(config, RasterSurface::new()),
        }
    }

    pub fn editor(&self) -> &Editor<RasterSurface> {
        &self.editor
    }

    /// Parse a JSON array of steps.
    pub fn parse_steps(json: &str) -> Result<Vec<SessionStep>, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a session script from disk.
    pub fn load_steps(path: &Path) -> Result<Vec<SessionStep>, AppError> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let steps = Self::parse_steps(&json)?;
        log::info!("Loaded {} steps from {}", steps.len(), path.display());
        Ok(steps)
    }

    /// Replay every step. A failing step is logged and skipped.
    pub fn run(&mut self, steps: &[SessionStep]) -> SessionReport {
        let mut report = SessionReport::default();
        for (index, step) in steps.iter().enumerate() {
            match self.apply(step) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    log::warn!("Step {} failed: {e}", index + 1);
                    report.failed += 1;
                }
            }
            self.log_events();
        }
        report
    }

    /// Apply a single step.
    pub fn apply(&mut self, step: &SessionStep) -> Result<(), AppError> {
        log::debug!("Step: {step:?}");
        match step {
            SessionStep::Tool { tool } => self.editor.set_tool(*tool),
            SessionStep::Click { x, y } => {
                self.editor.pointer_down(Point::new(*x, *y));
            }
            SessionStep::Key {
                key,
                modifiers,
                text_input_focused,
            } => {
                let event = KeyEvent {
                    key: key.clone(),
                    modifiers: *modifiers,
                    text_input_focused: *text_input_focused,
                };
                if self.editor.handle_key(&event).is_none() {
                    log::debug!("Key {key} not handled");
                }
            }
            SessionStep::Set { property, value } => {
                let outcome = self.editor.edit_property_str(property, &value.as_form_value())?;
                if let EditOutcome::NotApplicable(kind) = outcome {
                    log::debug!("{property} does not apply to {kind}");
                }
            }
            SessionStep::Duplicate => {
                self.editor.duplicate_selected();
            }
            SessionStep::Delete => {
                self.editor.delete_selected();
            }
            SessionStep::Clear => self.editor.clear_canvas(),
            SessionStep::Resize { width, height } => {
                self.editor.set_canvas_size(*width, *height)?;
            }
            SessionStep::Background { color } => {
                let color = SerializableColor::from_hex(color)
                    .ok_or_else(|| AppError::InvalidColor(color.clone()))?;
                self.editor.set_background(color);
            }
            SessionStep::Export { format, path } => {
                let bytes = self.editor.export(*format)?;
                std::fs::write(path, &bytes).map_err(|source| AppError::Io {
                    path: path.clone(),
                    source,
                })?;
                log::info!("Wrote {}", path.display());
            }
        }
        Ok(())
    }

    /// The final scene as pretty JSON.
    pub fn scene_json(&self) -> Result<String, AppError> {
        Ok(self.editor.document().to_json()?)
    }

    fn log_events(&mut self) {
        for event in self.editor.drain_events() {
            match event {
                EditorEvent::Notice(message) => log::info!("{message}"),
                other => log::debug!("Event: {other:?}"),
            }
        }
    }
}
