// ABOUTME: Output writers for the generated build descriptor (stdout, files)
// ABOUTME: File output is written to a temp file and renamed over the target in one step

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use super::error::{OutputError, Result};

pub trait OutputWriter {
    fn write(&self, content: &str) -> Result<()>;

    /// Human-readable destination, used in logs and summaries
    fn destination(&self) -> String;
}

pub struct StdoutWriter;

pub struct FileWriter {
    path: PathBuf,
    create_dirs: bool,
}

impl Default for StdoutWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for StdoutWriter {
    fn write(&self, content: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(content.as_bytes())?;
        handle.flush()?;

        debug!("Output written to stdout ({} chars)", content.len());
        Ok(())
    }

    fn destination(&self) -> String {
        "stdout".to_string()
    }
}

impl FileWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            create_dirs: true,
        }
    }

    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

/// Temp file in `dir` whose mode matches a plainly created file.
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    // Subject to umask, like File::create.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

impl OutputWriter for FileWriter {
    fn write(&self, content: &str) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if self.create_dirs {
            std::fs::create_dir_all(&parent).map_err(|e| OutputError::WriteError {
                message: format!("Failed to create directory {}: {}", parent.display(), e),
            })?;
        }

        let mut temp = temp_file_in(&parent).map_err(|e| OutputError::WriteError {
            message: format!("Failed to create temp file in {}: {}", parent.display(), e),
        })?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;

        // An existing descriptor keeps its mode.
        if let Ok(metadata) = std::fs::metadata(&self.path) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }

        // Overwrites any existing file.
        temp.persist(&self.path).map_err(|e| OutputError::WriteError {
            message: format!("Failed to write {}: {}", self.path.display(), e.error),
        })?;

        info!(
            "Output written to {} ({} bytes)",
            self.path.display(),
            content.len()
        );
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}
