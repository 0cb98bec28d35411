//! Session - one preview workspace
//!
//! Owns the font registry, the settings snapshot and the preview text, plus
//! the font table the registry releases into. Nothing here is global: two
//! sessions never share state.
//!
//! The session is the only writer of the registry. Uploads run detached from
//! it and queue their outcomes; [`Session::pump`] applies whatever has
//! finished, so intents and completions from several batches interleave
//! freely.

use std::rc::Rc;

use smol::channel::{self, Receiver, Sender};
use typelab_fonts::{
    FontId, FontInfo, FontRegistry, FontResource, FontSource, FontTable, PickedFile,
};
use typelab_style::{ActiveFont, SettingUpdate, Settings, StyleDescriptor, project};

use crate::config::SessionConfig;
use crate::control::{Intent, Slider, sliders};
use crate::notice::{Notice, NoticeSink};
use crate::upload::{Applied, BatchId, BatchReport, Completed, Upload, apply};

/// A font preview session
pub struct Session<T: FontTable> {
    table: Rc<T>,
    registry: FontRegistry,
    settings: Settings,
    text: String,
    next_batch: u64,
    outcomes_tx: Sender<Completed>,
    outcomes_rx: Receiver<Completed>,
}

impl<T: FontTable> Session<T> {
    /// Create a session with default configuration
    pub fn new(table: T) -> Self {
        Self::with_config(SessionConfig::default(), table)
    }

    /// Create a session from `config`
    pub fn with_config(config: SessionConfig, table: T) -> Self {
        tracing::info!("TypeLab session {} started", crate::VERSION);
        let (outcomes_tx, outcomes_rx) = channel::unbounded();
        Self {
            table: Rc::new(table),
            registry: FontRegistry::with_family_prefix(config.family_prefix),
            settings: config.settings,
            text: config.text,
            next_batch: 0,
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Uploaded fonts in completion order
    pub fn fonts(&self) -> impl Iterator<Item = &FontResource> {
        self.registry.iter()
    }

    /// The active font, if the active pointer resolves
    pub fn active_font(&self) -> Option<&FontResource> {
        self.registry.lookup_active()
    }

    /// Information panel for the active font
    pub fn font_info(&self) -> Option<FontInfo> {
        self.active_font().map(FontResource::info)
    }

    /// Replace the settings snapshot with one field changed
    pub fn update_setting(&mut self, update: SettingUpdate) {
        self.settings = self.settings.update(update);
    }

    /// Point the preview at `id`. Unknown ids fall back to the default family.
    pub fn select_font(&mut self, id: FontId) {
        self.registry.select(id);
    }

    /// Replace the preview text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Apply one control-panel intent.
    ///
    /// A file-picker intent starts an upload and returns it; run it and
    /// [`pump`](Self::pump) the session to publish the fonts.
    pub fn dispatch(&mut self, intent: Intent) -> Option<Upload<T, PickedFile>> {
        if let Some(update) = intent.setting_update() {
            self.update_setting(update);
            return None;
        }
        match intent {
            Intent::SelectFont(id) => self.select_font(id),
            Intent::EditText(text) => self.set_text(text),
            Intent::UseSample(sample) => self.set_text(sample.text()),
            Intent::Upload(files) => return Some(self.start_upload(files)),
            Intent::Numeric { .. }
            | Intent::Transform(_)
            | Intent::Align(_)
            | Intent::Direction(_) => {}
        }
        None
    }

    /// Start uploading a batch of files.
    ///
    /// Unsupported extensions are skipped here. The returned job borrows
    /// nothing from the session, so other intents and further uploads can be
    /// handled while it runs.
    pub fn start_upload<F: FontSource>(&mut self, files: Vec<F>) -> Upload<T, F> {
        let batch = BatchId(self.next_batch);
        self.next_batch += 1;
        Upload::start(
            batch,
            Rc::clone(&self.table),
            &mut self.registry,
            files,
            self.outcomes_tx.clone(),
        )
    }

    /// Apply every finished load queued so far, in completion order.
    ///
    /// Each success is registered and becomes the active font; each failure
    /// leaves the registry alone and raises one notice.
    pub fn pump<N: NoticeSink + ?Sized>(&mut self, notices: &mut N) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(completed) = self.outcomes_rx.try_recv() {
            applied.push(apply(&*self.table, &mut self.registry, completed, notices));
        }
        applied
    }

    /// Upload a batch and publish it before returning.
    ///
    /// The report covers this batch only; completions of other batches that
    /// were queued meanwhile are applied too.
    pub async fn upload<F, N>(&mut self, files: Vec<F>, notices: &mut N) -> BatchReport
    where
        F: FontSource,
        N: NoticeSink + ?Sized,
    {
        let upload = self.start_upload(files);
        let batch = upload.batch();
        let skipped = upload.run().await;

        let mut report = BatchReport {
            skipped,
            ..BatchReport::default()
        };
        for applied in self.pump(notices) {
            if applied.batch == batch {
                report.record(applied);
            }
        }
        tracing::info!(
            registered = report.registered.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "upload batch finished"
        );
        report
    }

    /// Current preview style
    pub fn style(&self) -> StyleDescriptor {
        let font = self.active_font().map(|f| ActiveFont {
            family: f.family_handle().as_str(),
            file_name: f.original_file_name(),
            format: f.format().as_str(),
        });
        project(&self.settings, font, &self.text)
    }

    /// Sliders reflecting the current settings
    pub fn sliders(&self) -> Vec<Slider> {
        sliders(&self.settings)
    }

    /// Release every font resource. Safe to call any number of times; only
    /// the first call releases anything. Returns the number released.
    ///
    /// Loads still in flight are refused when pumped afterwards and their
    /// handles go straight back to the table.
    pub fn teardown(&mut self) -> usize {
        self.registry.teardown(&*self.table)
    }
}

impl<T: FontTable> Drop for Session<T> {
    fn drop(&mut self) {
        self.teardown();
        // Publish nothing, but hand back handles that already finished loading.
        let mut discard: Vec<Notice> = Vec::new();
        self.pump(&mut discard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typelab_fonts::{FontDbTable, MemoryFile};
    use typelab_style::{Direction, NumericField, SampleText, TextTransform};

    #[test]
    fn test_default_session() {
        let session = Session::new(FontDbTable::new());
        assert_eq!(session.text(), SampleText::Default.text());
        assert_eq!(session.settings(), &Settings::default());
        assert!(session.active_font().is_none());
        assert!(session.font_info().is_none());
    }

    #[test]
    fn test_dispatch_settings() {
        let mut session = Session::new(FontDbTable::new());
        session.dispatch(Intent::Numeric {
            field: NumericField::WordSpacing,
            raw: "99".into(),
        });
        session.dispatch(Intent::Transform(TextTransform::Capitalize));
        session.dispatch(Intent::Direction(Direction::Rtl));

        let style = session.style();
        assert_eq!(style.word_spacing, 50.0);
        assert_eq!(style.text_transform, TextTransform::Capitalize);
        assert_eq!(style.direction, Direction::Rtl);
    }

    #[test]
    fn test_dispatch_text() {
        let mut session = Session::new(FontDbTable::new());
        session.dispatch(Intent::EditText(String::new()));
        assert_eq!(session.style().word_count, 0);

        session.dispatch(Intent::UseSample(SampleText::Heading));
        assert_eq!(session.text(), SampleText::Heading.text());
    }

    #[test]
    fn test_select_unknown_font() {
        let mut session = Session::new(FontDbTable::new());
        session.dispatch(Intent::SelectFont(FontId::from("nope")));
        assert!(session.active_font().is_none());
        assert!(session.style().family.is_fallback());
    }

    #[test]
    fn test_dispatch_upload_intent() {
        let mut session = Session::new(FontDbTable::new());
        let files = vec![
            PickedFile::from(MemoryFile::new("bad.ttf", b"nope".to_vec())),
            PickedFile::from(MemoryFile::new("notes.md", Vec::new())),
        ];
        let upload = session.dispatch(Intent::Upload(files)).unwrap();
        assert_eq!(upload.len(), 1);
        assert_eq!(upload.skipped(), ["notes.md".to_string()]);

        smol::block_on(upload.run());
        let mut notices: Vec<Notice> = Vec::new();
        let applied = session.pump(&mut notices);
        assert_eq!(applied.len(), 1);
        assert_eq!(notices.len(), 1);
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_pump_with_nothing_queued() {
        let mut session = Session::new(FontDbTable::new());
        let mut notices: Vec<Notice> = Vec::new();
        assert!(session.pump(&mut notices).is_empty());
        assert!(notices.is_empty());
    }
}
