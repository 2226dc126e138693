//! OpenCanvas Core Library
//!
//! Platform-agnostic scene model, tools and editor logic for the OpenCanvas
//! 2D editor. Painting is delegated to a [`RenderSurface`].

pub mod canvas;
pub mod config;
pub mod editor;
pub mod input;
pub mod properties;
pub mod shapes;
pub mod shortcuts;
pub mod surface;
pub mod tools;

pub use canvas::{Canvas, CanvasDocument, PointerOutcome};
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, EditorEvent};
pub use input::{KeyEvent, Modifiers};
pub use properties::{EditOutcome, PropertiesBridge, PropertyEdit, PropertyError, PropertyName, PropertyPanel};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle, ShapeTrait, ShapeUpdate};
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use surface::{ExportFormat, RecordingSurface, RenderSurface, SurfaceError, SurfaceResult};
pub use tools::{ToolKind, ToolManager};
