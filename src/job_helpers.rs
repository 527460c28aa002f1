use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    process,
};

use crate::LutInfo;

pub fn load_volume<P: AsRef<Path>>(path: P) -> Result<volume_fmt::Volume, volume_fmt::ReadError> {
    volume_fmt::load(BufReader::new(File::open(path.as_ref())?))
}

/// Scans a directory for color table files (`.txt`), sorted by name.
///
/// A missing or unreadable directory just yields an empty list; the GUI
/// reports that separately.
pub fn discover_luts<P: AsRef<Path>>(dir: P) -> Vec<LutInfo> {
    let mut luts = Vec::new();

    let entries = match std::fs::read_dir(dir.as_ref()) {
        Ok(entries) => entries,
        Err(_) => return luts,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_txt = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if is_txt && path.is_file() {
            if let Some(stem) = path.file_stem() {
                luts.push(LutInfo {
                    name: stem.to_string_lossy().into_owned(),
                    full_filepath: path,
                });
            }
        }
    }

    luts.sort_by(|a, b| a.name.cmp(&b.name));
    luts
}

/// Where resource files live: next to the executable in an installed
/// layout, or the repository's `resources/` during development.
pub fn resource_dir() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(dir) = exe_path.parent() {
            let installed = dir.join("resources");
            if installed.is_dir() {
                return installed;
            }
        }
    }

    PathBuf::from("resources")
}

#[derive(Debug)]
#[non_exhaustive]
pub enum LaunchError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::Io { ref source, .. } => Some(source),
        }
    }
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchError::Io { path, source } => write!(
                f,
                "failed to launch \"{}\": {}",
                path.to_string_lossy(),
                source
            ),
        }
    }
}

/// Spawns the external tool at `path` and detaches from it.
pub fn launch_tool<P: AsRef<Path>>(path: P) -> Result<process::Child, LaunchError> {
    let path = path.as_ref();
    process::Command::new(path)
        .spawn()
        .map_err(|e| LaunchError::Io {
            path: path.into(),
            source: e,
        })
}
