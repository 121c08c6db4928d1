//! Live preview of mediation pages: a debounced file watcher, an atomically
//! swapped page snapshot and the session that ties them to a renderer.

pub mod config;
pub mod debounce;
pub mod error;
pub mod live;
pub mod render;
pub mod session;
pub mod watcher;

pub use config::{SessionConfig, WatchConfig};
pub use debounce::{Debouncer, debounce_changes};
pub use error::LiveError;
pub use live::LivePage;
pub use render::{OutlineRenderer, Renderer};
pub use session::Session;
pub use watcher::{ChangeKind, FileChange, ReloadWatcher};
