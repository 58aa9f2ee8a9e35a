//! Streams a response body into a freshly named output file.

use std::io;
use std::path::{Path, PathBuf};

use crate::resolver::NameRegistry;
use crate::storage::PartialFile;
use crate::url_model::is_image_content_type;

use super::error::FetchError;
use super::head::ResponseHead;

/// How many names to try when exclusive creation keeps hitting files that
/// appeared on disk after the registry was seeded.
const MAX_CREATE_ATTEMPTS: usize = 16;

/// Receives body chunks from curl. The output file is opened lazily on the
/// first chunk of a successful response, after all headers are known.
pub(super) struct BodySink<'a> {
    url: &'a str,
    output_dir: &'a Path,
    registry: &'a NameRegistry,
    images_only: bool,
    file: Option<PartialFile>,
    failure: Option<FetchError>,
}

impl<'a> BodySink<'a> {
    pub fn new(url: &'a str, output_dir: &'a Path, registry: &'a NameRegistry, images_only: bool) -> Self {
        Self {
            url,
            output_dir,
            registry,
            images_only,
            file: None,
            failure: None,
        }
    }

    /// Handle one chunk. Returns false to make curl abort the transfer; the
    /// reason is kept for [`BodySink::take_failure`].
    pub fn accept(&mut self, head: &ResponseHead, data: &[u8]) -> bool {
        if !head.is_success() {
            // error bodies are discarded; the status is reported after perform
            return true;
        }
        if self.file.is_none() {
            if let Err(e) = self.open(head) {
                self.failure = Some(e);
                return false;
            }
        }
        let Some(file) = self.file.as_mut() else {
            return false;
        };
        match file.write_chunk(data) {
            Ok(()) => true,
            Err(e) => {
                self.failure = Some(FetchError::filesystem(file.path(), &e));
                false
            }
        }
    }

    pub fn take_failure(&mut self) -> Option<FetchError> {
        self.failure.take()
    }

    /// Complete a successful transfer: opens the file if the body was empty,
    /// then flushes and keeps it. Returns the saved path and byte count.
    pub fn finish(mut self, head: &ResponseHead) -> Result<(PathBuf, u64), FetchError> {
        if self.file.is_none() {
            self.open(head)?;
        }
        match self.file.take() {
            Some(file) => {
                let path = file.path().to_path_buf();
                file.commit().map_err(|e| FetchError::filesystem(&path, &e))
            }
            None => Err(FetchError::Filesystem {
                path: self.output_dir.to_path_buf(),
                message: "output file was not opened".to_string(),
            }),
        }
    }

    fn open(&mut self, head: &ResponseHead) -> Result<(), FetchError> {
        if self.images_only {
            let content_type = head.content_type.clone().unwrap_or_default();
            if !is_image_content_type(&content_type) {
                return Err(FetchError::UnexpectedContentType { content_type });
            }
        }

        let meta = head.meta();
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let candidate = self.registry.claim(self.url, &meta);
            let path = self.output_dir.join(candidate.file_name());
            match PartialFile::create_new(&path) {
                Ok(file) => {
                    tracing::debug!(
                        path = %path.display(),
                        expected = ?head.content_length,
                        "writing response body"
                    );
                    self.file = Some(file);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    // claim() already recorded the name; the next claim moves on
                    tracing::debug!(path = %path.display(), "file appeared on disk, choosing another name");
                }
                Err(e) => return Err(FetchError::filesystem(&path, &e)),
            }
        }
        Err(FetchError::Filesystem {
            path: self.output_dir.to_path_buf(),
            message: format!("no free file name after {} attempts", MAX_CREATE_ATTEMPTS),
        })
    }
}
