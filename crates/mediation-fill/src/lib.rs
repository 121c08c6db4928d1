pub mod error;
pub mod image;
pub mod state;
pub mod value;

pub use error::ContentError;
pub use image::ImageExport;
pub use state::{DEFAULT_LANGUAGE, DEFAULT_RESTORE_DIR, FillableState, KNOWN_LANGUAGES, Slice};
pub use value::{ContentValue, FromContent};
