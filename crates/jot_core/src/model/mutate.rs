//! Edit-through-a-file protocol.
//!
//! # Responsibility
//! - Hand a marshaled object to an out-of-process tool via a temp file.
//! - Read the result back and apply it only when every step succeeded.
//!
//! # Invariants
//! - One temp file per call, removed on every exit path.
//! - A failed call leaves the object exactly as it was.
//!
//! # See also
//! - `Document::mutate_with`

use super::error::{DocumentError, DocumentResult, MutationStage, TransformError};
use super::object::Document;
use log::{debug, error, warn};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tempfile::NamedTempFile;

pub const DEFAULT_TEMP_PREFIX: &str = "jot_";
const TEMP_SUFFIX: &str = ".md";

/// Whether the transform altered the temp file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Changed,
    Unchanged,
}

impl MutationOutcome {
    pub fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Source of uniquely named scratch files.
///
/// Returned files must be removed when dropped.
pub trait TempFileProvider {
    fn create(&self) -> io::Result<NamedTempFile>;
}

/// Temp files under the system temp dir, or `dir` when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTempFiles {
    dir: Option<PathBuf>,
    prefix: String,
}

impl SystemTempFiles {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            dir: None,
            prefix: prefix.into(),
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for SystemTempFiles {
    fn default() -> Self {
        Self::new(DEFAULT_TEMP_PREFIX)
    }
}

impl TempFileProvider for SystemTempFiles {
    fn create(&self) -> io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.prefix).suffix(TEMP_SUFFIX);
        match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}

pub(crate) fn run<D, F>(
    document: &mut D,
    provider: &dyn TempFileProvider,
    transform: F,
) -> DocumentResult<MutationOutcome>
where
    D: Document + ?Sized,
    F: FnOnce(&Path) -> Result<(), TransformError>,
{
    let started_at = Instant::now();
    let object_id = document.id();
    let class = document.class();

    let result = round_trip(document, provider, transform);
    match &result {
        Ok(outcome) => debug!(
            "event=document_mutate module=model status=ok class={} object_id={} changed={} duration_ms={}",
            class,
            object_id,
            outcome.is_changed(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=document_mutate module=model status=error class={} object_id={} duration_ms={} error_code={} error={}",
            class,
            object_id,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

fn round_trip<D, F>(
    document: &mut D,
    provider: &dyn TempFileProvider,
    transform: F,
) -> DocumentResult<MutationOutcome>
where
    D: Document + ?Sized,
    F: FnOnce(&Path) -> Result<(), TransformError>,
{
    let before = document.marshal()?;

    let mut file = provider
        .create()
        .map_err(DocumentError::io(MutationStage::CreateTempFile))?;
    file.write_all(&before)
        .and_then(|()| file.flush())
        .map_err(DocumentError::io(MutationStage::WriteTempFile))?;
    // Close our handle so the transform sees the only open copy.
    let temp_path = file.into_temp_path();
    let location: &Path = &temp_path;

    transform(location).map_err(DocumentError::Transform)?;

    let after =
        std::fs::read(location).map_err(DocumentError::io(MutationStage::ReadTempFile))?;
    document.unmarshal(&after)?;

    if let Err(err) = temp_path.close() {
        warn!(
            "event=temp_file_cleanup module=model status=error error={}",
            err
        );
    }

    Ok(if after == before {
        MutationOutcome::Unchanged
    } else {
        MutationOutcome::Changed
    })
}

/// Transform that opens the file in `program` and waits for it to exit.
///
/// A non-zero exit status is reported as a transform error.
pub fn external_editor(
    program: impl Into<OsString>,
) -> impl FnOnce(&Path) -> Result<(), TransformError> {
    let program = program.into();
    move |path: &Path| {
        let status = Command::new(&program).arg(path).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(format!(
                "editor `{}` exited with {status}",
                program.to_string_lossy()
            )
            .into())
        }
    }
}

/// Editor named by `$VISUAL`, falling back to `$EDITOR`.
pub fn editor_from_env() -> Option<OsString> {
    ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(std::env::var_os)
        .find(|value| !value.is_empty())
}
