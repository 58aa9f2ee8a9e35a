//! Filename resolution for downloaded images.
//!
//! `resolve` is a pure function of the request URL, the response metadata
//! and the names already taken in this run. `NameRegistry` owns the
//! collision set and serializes resolve-then-register across workers.

mod registry;

use std::collections::HashSet;
use std::fmt;

use crate::url_model::{derive_base_name, extension_for_content_type, split_extension};

pub use registry::NameRegistry;

/// Response headers that influence the file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
}

/// A resolved, sanitized file name split into stem and optional extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameCandidate {
    pub stem: String,
    pub extension: Option<String>,
}

impl FilenameCandidate {
    pub fn file_name(&self) -> String {
        match &self.extension {
            Some(ext) => format!("{}.{}", self.stem, ext),
            None => self.stem.clone(),
        }
    }

    /// Same name with `-n` inserted before the extension.
    fn with_disambiguator(&self, n: u32) -> Self {
        Self {
            stem: format!("{}-{}", self.stem, n),
            extension: self.extension.clone(),
        }
    }
}

impl fmt::Display for FilenameCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Derives a filesystem-safe name for `url` that is not in `existing`.
///
/// Priority: Content-Disposition filename, URL path segment, generated name.
/// A name without extension gets one from the Content-Type table when the
/// type is a known image subtype. Collisions get `-1`, `-2`, ... before the
/// extension. Never fails.
pub fn resolve(url: &str, meta: &ResponseMeta, existing: &HashSet<String>) -> FilenameCandidate {
    let base = derive_base_name(url, meta.content_disposition.as_deref());
    let (stem, ext) = split_extension(&base);

    let extension = match ext {
        Some(ext) => Some(ext.to_string()),
        None => meta
            .content_type
            .as_deref()
            .and_then(extension_for_content_type)
            .map(str::to_string),
    };

    let candidate = FilenameCandidate {
        stem: stem.to_string(),
        extension,
    };
    if !existing.contains(&candidate.file_name()) {
        return candidate;
    }

    let mut n = 1u32;
    loop {
        let next = candidate.with_disambiguator(n);
        if !existing.contains(&next.file_name()) {
            return next;
        }
        n += 1;
    }
}
