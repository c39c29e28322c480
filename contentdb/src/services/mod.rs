//! Services module
//!
//! Business logic that coordinates between callers, the repository and the
//! rendering pipeline.

pub mod content;
pub mod cursor;
pub mod module;
pub mod render;
pub mod settings;

pub use content::{ContentService, Notice, NoticeLevel};
pub use cursor::EntryCursor;
pub use module::{ContentModule, ModuleAction};
pub use render::Renderer;
pub use settings::{ContentSettings, ListingSettings, RenderSettings, SettingsService};
