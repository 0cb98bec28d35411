//! TypeLab Fonts
//!
//! Uploaded font handling for the TypeLab preview:
//! - Font resources with synthetic family handles
//! - Append-only font registry with an active pointer
//! - Font table collaborator (fontdb + ttf-parser validation)
//! - WOFF unpacking and WOFF2 directory checks
//! - File sources (disk, in-memory and file-picker results)

mod inflate;
pub mod registry;
pub mod resource;
pub mod source;
pub mod table;
pub mod woff;

pub use registry::FontRegistry;
pub use resource::{
    ALLOWED_EXTENSIONS, FamilyHandle, FontFormat, FontId, FontInfo, FontResource, PendingFont,
    ResourceHandle, accept_attribute, display_name, extension_of,
};
pub use source::{DiskFile, FontSource, MemoryFile, PickedFile};
pub use table::{FontDbTable, FontTable};

/// Font handling error types
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Failed to read {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse font: {0}")]
    FontParsing(String),

    #[error("Family already registered: {0}")]
    DuplicateFamily(String),

    #[error("Font registry already torn down")]
    RegistryClosed,
}

pub type Result<T> = std::result::Result<T, FontError>;
