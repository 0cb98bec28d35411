//! TypeLab Engine
//!
//! Client-side font preview: upload fonts, tune typographic settings, edit
//! sample text and get a live style for the renderer.
//!
//! # Example
//! ```rust,ignore
//! use typelab_engine::{Intent, Session, fonts::{DiskFile, FontDbTable}};
//!
//! let mut session = Session::new(FontDbTable::new());
//! let mut notices = Vec::new();
//!
//! // The job runs detached; the session keeps taking intents meanwhile.
//! let upload = session.start_upload(vec![DiskFile::new("Inter.ttf")]);
//! session.dispatch(Intent::EditText("Hamburgefonstiv".into()));
//! smol::block_on(upload.run());
//! session.pump(&mut notices);
//! println!("{}", session.style().to_css());
//! session.teardown();
//! ```

mod config;
mod session;
pub mod control;
pub mod notice;
pub mod upload;

pub use config::{ConfigError, SessionConfig};
pub use control::{Intent, Slider};
pub use notice::{LogNotices, Notice, NoticeSink};
pub use session::Session;
pub use upload::{Applied, BatchId, BatchReport, Upload, UploadFailure};

// Re-export sub-crates for advanced usage
pub use typelab_fonts as fonts;
pub use typelab_style as style;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
