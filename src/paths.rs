use crate::client::Preserve;
use crate::constants::MARKER;
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where the compressed bytes should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Write next to the source as `<stem>.cmprs.<ext>`.
    Default,
    /// Overwrite the source in place.
    Replace,
    /// Write to a user-chosen path.
    NewName(PathBuf),
}

impl Mode {
    /// `--replace` wins over `--new`.
    pub fn from_flags(replace: bool, new_name: Option<PathBuf>) -> Self {
        match (replace, new_name) {
            (true, _) => Mode::Replace,
            (false, Some(name)) => Mode::NewName(name),
            (false, None) => Mode::Default,
        }
    }
}

/// One compress request, built from the command line and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source: PathBuf,
    pub mode: Mode,
    pub force: bool,
    pub preserve: Vec<Preserve>,
}

impl FileTask {
    pub fn new(source: &Path, mode: Mode, force: bool, preserve: Vec<Preserve>) -> Result<Self> {
        Ok(Self {
            source: std::path::absolute(source)?,
            mode,
            force,
            preserve,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    pub path: PathBuf,
    /// A file already sits at `path` and will be overwritten.
    pub collision_detected: bool,
}

/// Works out where the output of `task` is written, failing before any
/// remote call when the source is missing or the target is taken.
pub fn resolve(task: &FileTask) -> Result<ResolvedDestination> {
    if !task.source.exists() {
        return Err(Error::NotFound(task.source.clone()));
    }

    let path = match &task.mode {
        Mode::Replace => task.source.clone(),
        Mode::NewName(requested) => {
            let path = std::path::absolute(requested)?;
            if path.exists() && !task.force {
                return Err(Error::DestinationExists(path));
            }
            path
        }
        Mode::Default => marked_path(&task.source),
    };

    let collision_detected = path.exists();
    Ok(ResolvedDestination {
        path,
        collision_detected,
    })
}

/// Inserts the marker before the extension: `dir/photo.png` becomes
/// `dir/photo.cmprs.png`. Names without an extension get it appended.
pub fn marked_path(source: &Path) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = source.file_stem() {
        name.push(stem);
    }
    name.push(MARKER);
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }
    source.with_file_name(name)
}
