//! Upload pipeline
//!
//! Starting an upload only reserves ids for the accepted files and hands back
//! an [`Upload`] job; the session stays free for other intents. Running the
//! job reads and registers every file as its own task. Finished loads go over
//! a channel to the session, which applies them one at a time when it is
//! pumped, so registrations from any number of batches land atomically and
//! in completion order. The last one to finish becomes the active font.

use std::rc::Rc;

use smol::LocalExecutor;
use smol::channel::Sender;
use typelab_fonts::{
    FontError, FontFormat, FontId, FontRegistry, FontSource, FontTable, PendingFont,
    ResourceHandle,
};

use crate::notice::{Notice, NoticeSink};

/// Identifies one started upload batch within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(pub u64);

/// A file that failed to load
#[derive(Debug)]
pub struct UploadFailure {
    pub file_name: String,
    pub error: FontError,
}

/// What happened to one finished load once applied to the session
#[derive(Debug)]
pub struct Applied {
    pub batch: BatchId,
    pub outcome: Result<FontId, UploadFailure>,
}

/// What happened to one batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Fonts added, in completion order
    pub registered: Vec<FontId>,
    /// Files ignored for their extension
    pub skipped: Vec<String>,
    pub failures: Vec<UploadFailure>,
}

impl BatchReport {
    /// Font activated by this batch, if any
    pub fn activated(&self) -> Option<&FontId> {
        self.registered.last()
    }

    /// Fold one applied load into the report
    pub fn record(&mut self, applied: Applied) {
        match applied.outcome {
            Ok(id) => self.registered.push(id),
            Err(failure) => self.failures.push(failure),
        }
    }
}

/// A finished load on its way to the session
pub(crate) struct Completed {
    batch: BatchId,
    pending: PendingFont,
    result: Result<ResourceHandle, FontError>,
}

/// A started batch whose files have not been loaded yet.
///
/// Holds no borrow of the session: run it on any executor while the session
/// keeps handling intents, then pump the session to publish the results.
#[must_use = "an upload does nothing until it is run"]
pub struct Upload<T, F> {
    batch: BatchId,
    table: Rc<T>,
    files: Vec<(F, PendingFont)>,
    skipped: Vec<String>,
    outcomes: Sender<Completed>,
}

impl<T, F> Upload<T, F>
where
    T: FontTable,
    F: FontSource,
{
    /// Split `files` into accepted uploads and skipped names, reserving an id
    /// and family handle for each accepted file.
    pub(crate) fn start(
        batch: BatchId,
        table: Rc<T>,
        registry: &mut FontRegistry,
        files: Vec<F>,
        outcomes: Sender<Completed>,
    ) -> Self {
        let mut accepted = Vec::new();
        let mut skipped = Vec::new();
        for file in files {
            match FontFormat::from_file_name(file.name()) {
                Some(format) => {
                    let pending = registry.allocate(file.name(), format);
                    accepted.push((file, pending));
                }
                None => {
                    tracing::debug!(file = file.name(), "skipping unsupported file");
                    skipped.push(file.name().to_string());
                }
            }
        }
        tracing::debug!(batch = batch.0, accepted = accepted.len(), "upload started");
        Self {
            batch,
            table,
            files: accepted,
            skipped,
            outcomes,
        }
    }

    pub fn batch(&self) -> BatchId {
        self.batch
    }

    /// Files ignored for their extension
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Number of files that will be loaded
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Load every accepted file, each as an independent task, queueing the
    /// outcomes for the session. Returns the skipped file names.
    pub async fn run(self) -> Vec<String> {
        let Upload {
            batch,
            table,
            files,
            skipped,
            outcomes,
        } = self;

        let executor = LocalExecutor::new();
        let tasks: Vec<_> = files
            .into_iter()
            .map(|(file, pending)| {
                let table = Rc::clone(&table);
                let outcomes = outcomes.clone();
                executor.spawn(async move {
                    let result = load(&*table, &file, &pending).await;
                    let completed = Completed {
                        batch,
                        pending,
                        result,
                    };
                    // Session gone: nobody will own the handle, release it here.
                    if let Err(closed) = outcomes.send(completed).await {
                        if let Ok(handle) = closed.into_inner().result {
                            table.release_resource(handle);
                        }
                    }
                })
            })
            .collect();

        executor
            .run(async {
                for task in tasks {
                    task.await;
                }
            })
            .await;
        skipped
    }
}

/// Read, wrap and register one file with the font table
async fn load<T, F>(table: &T, file: &F, pending: &PendingFont) -> Result<ResourceHandle, FontError>
where
    T: FontTable,
    F: FontSource,
{
    let bytes = file.read().await.map_err(|source| FontError::Read {
        file: file.name().to_string(),
        source,
    })?;
    let handle = ResourceHandle::new(pending.id.clone(), bytes);

    match table.register_font(&pending.family, &handle).await {
        Ok(()) => Ok(handle),
        Err(e) => {
            table.release_resource(handle);
            Err(e)
        }
    }
}

/// Publish one finished load into the registry.
///
/// A failure leaves the registry untouched and raises exactly one notice.
pub(crate) fn apply<T, N>(
    table: &T,
    registry: &mut FontRegistry,
    completed: Completed,
    notices: &mut N,
) -> Applied
where
    T: FontTable + ?Sized,
    N: NoticeSink + ?Sized,
{
    let Completed {
        batch,
        pending,
        result,
    } = completed;
    let file_name = pending.file_name.clone();

    let handle = match result {
        Ok(handle) => handle,
        Err(error) => {
            tracing::warn!(file = %file_name, %error, "failed to load font");
            notices.notify(Notice::load_failure(&file_name));
            return Applied {
                batch,
                outcome: Err(UploadFailure { file_name, error }),
            };
        }
    };

    let outcome = match registry.register(pending.into_resource(handle)) {
        Ok(id) => {
            registry.select(id.clone());
            Ok(id)
        }
        Err(rejected) => {
            tracing::warn!(file = %file_name, "registry closed, dropping upload");
            if let Some(handle) = rejected.into_handle() {
                table.release_resource(handle);
            }
            Err(UploadFailure {
                file_name,
                error: FontError::RegistryClosed,
            })
        }
    };
    Applied { batch, outcome }
}
