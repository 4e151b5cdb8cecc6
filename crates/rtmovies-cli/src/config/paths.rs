//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Application directory name under the config root.
const APP_DIR: &str = "rtmovies";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// Lookup order:
/// 1. `{dir}/config.toml` when `dir` is given (`--dir`).
/// 2. `$XDG_CONFIG_HOME/rtmovies/config.toml` when set and non-empty.
/// 3. `$HOME/.config/rtmovies/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set
/// (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_from(
        dir.map(PathBuf::as_path),
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// Environment-independent core of [`resolve_config_path`].
fn resolve_from(
    dir: Option<&Path>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(xdg) = xdg_config_home.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(xdg.join(APP_DIR).join(CONFIG_FILE));
    }
    let Some(home) = home else {
        bail!("neither XDG_CONFIG_HOME nor HOME environment variable is set");
    };
    Ok(home.join(".config").join(APP_DIR).join(CONFIG_FILE))
}
