//! ImageMagick resizer backend.
//!
//! Every resize is one blocking `convert` (`magick` on Windows) process:
//!
//! ```text
//! convert SRC -auto-orient -resize WxH -quality Q DST                        # fit
//! convert SRC -auto-orient -resize WxH^ -gravity Center -extent WxH -quality Q DST  # crop
//! ```
//!
//! `-auto-orient` applies the EXIF orientation before scaling, which is why
//! [`computed_size`](super::computed_size) swaps the sides of rotated sources.

use super::backend::{BackendError, ImageBackend};
use super::params::ResizeParams;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Executable name searched for in extra directories and on `PATH`.
pub const IMAGEMAGICK_EXE: &str = if cfg!(windows) { "magick" } else { "convert" };

/// Locate the ImageMagick executable.
///
/// Order: the explicitly `configured` path if it is a file, then
/// [`IMAGEMAGICK_EXE`] inside each of `search_paths`, then `PATH`.
pub fn find_imagemagick(
    configured: Option<&Path>,
    search_paths: &[PathBuf],
) -> Result<PathBuf, BackendError> {
    find_executable(
        IMAGEMAGICK_EXE,
        configured,
        search_paths,
        std::env::var_os("PATH"),
    )
}

fn find_executable(
    name: &str,
    configured: Option<&Path>,
    search_paths: &[PathBuf],
    path_var: Option<OsString>,
) -> Result<PathBuf, BackendError> {
    if let Some(configured) = configured.filter(|p| p.is_file()) {
        return Ok(configured.to_path_buf());
    }

    let file_name = Path::new(name).with_extension(std::env::consts::EXE_EXTENSION);
    if let Some(bundled) = search_paths
        .iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
    {
        return Ok(bundled);
    }

    let cwd = std::env::current_dir()?;
    which::which_in(name, path_var, cwd)
        .map_err(|_| BackendError::ExecutableNotFound(name.to_string()))
}

/// Argument vector (without the executable) for one resize.
///
/// Cropping needs a full box; a crop request without height is a plain fit.
pub fn command_args(params: &ResizeParams) -> Vec<OsString> {
    let geometry = params.geometry();
    let mut args: Vec<OsString> = vec![params.source.clone().into(), "-auto-orient".into()];

    if params.crop && params.height.is_some() {
        let fill = format!("{geometry}^");
        args.extend(
            [
                "-resize",
                fill.as_str(),
                "-gravity",
                "Center",
                "-extent",
                geometry.as_str(),
            ]
            .map(OsString::from),
        );
    } else {
        args.extend(["-resize", geometry.as_str()].map(OsString::from));
    }

    args.push("-quality".into());
    args.push(params.quality.value().to_string().into());
    args.push(params.output.clone().into());
    args
}

/// Resizer that shells out to ImageMagick.
#[derive(Debug, Clone)]
pub struct ImageMagickBackend {
    executable: PathBuf,
}

impl ImageMagickBackend {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Build a backend around the first executable [`find_imagemagick`] finds.
    pub fn locate(
        configured: Option<&Path>,
        search_paths: &[PathBuf],
    ) -> Result<Self, BackendError> {
        let executable = find_imagemagick(configured, search_paths)?;
        debug!(executable = %executable.display(), "using ImageMagick");
        Ok(Self::new(executable))
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl ImageBackend for ImageMagickBackend {
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let args = command_args(params);
        debug!(
            cmdline = %display_command(&self.executable, &args),
            "running ImageMagick"
        );

        let output = Command::new(&self.executable).args(&args).output()?;
        if !output.status.success() {
            return Err(BackendError::ProcessingFailed(format!(
                "{} exited with {}: {}",
                self.executable.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

fn display_command(executable: &Path, args: &[OsString]) -> String {
    std::iter::once(executable.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}
