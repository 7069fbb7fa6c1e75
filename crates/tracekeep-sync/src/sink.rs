use std::path::{Path, PathBuf};

/// One output document ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Unit key in the sync state
    pub key: String,
    pub filename: String,
    pub content: String,
}

/// Destination for rendered documents
pub trait DocumentSink {
    fn write(&mut self, document: &RenderedDocument) -> std::io::Result<()>;
}

/// Writes each document as `<dir>/<filename>`, replacing any previous version
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DocumentSink for DirectorySink {
    fn write(&mut self, document: &RenderedDocument) -> std::io::Result<()> {
        let path = self.dir.join(&document.filename);
        tracekeep_store::atomic_write(&path, document.content.as_bytes())?;
        tracing::info!("Wrote: {}", path.display());
        Ok(())
    }
}

/// Collects documents in memory
impl DocumentSink for Vec<RenderedDocument> {
    fn write(&mut self, document: &RenderedDocument) -> std::io::Result<()> {
        self.push(document.clone());
        Ok(())
    }
}

impl<S: DocumentSink + ?Sized> DocumentSink for &mut S {
    fn write(&mut self, document: &RenderedDocument) -> std::io::Result<()> {
        (**self).write(document)
    }
}
