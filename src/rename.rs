use crate::constants::MARKER;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    /// The name carried no marker; nothing was touched.
    Unchanged(PathBuf),
}

/// Removes the first `.cmprs` from `path`, or `None` when it has none.
pub fn strip_marker(path: &Path) -> Result<Option<PathBuf>> {
    let text = path
        .to_str()
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;

    Ok(text
        .find(MARKER)
        .map(|at| PathBuf::from(format!("{}{}", &text[..at], &text[at + MARKER.len()..]))))
}

/// Renames `photo.cmprs.png` to `photo.png`.
///
/// Refuses to replace an existing file unless `force` is set. A path
/// without the marker is left alone and reported as `Unchanged`, so running
/// this twice is harmless.
pub fn rename_marked(path: &Path, force: bool) -> Result<RenameOutcome> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let Some(target) = strip_marker(path)? else {
        return Ok(RenameOutcome::Unchanged(path.to_path_buf()));
    };

    if target.exists() && !force {
        return Err(Error::DestinationExists(target));
    }

    fs_err::rename(path, &target)?;

    Ok(RenameOutcome::Renamed {
        from: path.to_path_buf(),
        to: target,
    })
}
