use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model file not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Where model weights are served from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelLocation {
    /// A local directory holding the model files.
    Directory(PathBuf),
    /// An HTTP(S) base URL; files are downloaded once into the cache directory.
    Remote(String),
}

impl ModelLocation {
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ModelLocation::Remote(trimmed.trim_end_matches('/').to_string())
        } else {
            ModelLocation::Directory(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for ModelLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLocation::Directory(dir) => write!(f, "{}", dir.display()),
            ModelLocation::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Resolve a model file by name under `location`.
///
/// Directories are used as-is. Remote locations check the user cache
/// directory first and download into it on a miss.
pub fn resolve(location: &ModelLocation, name: &str) -> Result<PathBuf, ModelResolveError> {
    match location {
        ModelLocation::Directory(dir) => resolve_local(dir, name),
        ModelLocation::Remote(base) => resolve_remote(base, name, &model_cache_dir()?),
    }
}

fn resolve_local(dir: &Path, name: &str) -> Result<PathBuf, ModelResolveError> {
    let path = dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ModelResolveError::NotFound(path))
    }
}

fn resolve_remote(base: &str, name: &str, cache_dir: &Path) -> Result<PathBuf, ModelResolveError> {
    let cached_path = cache_dir.join(name);
    if cached_path.is_file() {
        log::debug!("Using cached model {}", cached_path.display());
        return Ok(cached_path);
    }

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    let url = format!("{base}/{name}");
    log::info!("Downloading {url}");
    download(&url, &cached_path)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/Facespot/models/`
/// - Linux: `$XDG_CACHE_HOME/Facespot/models/` or `~/.cache/Facespot/models/`
/// - Windows: `%LOCALAPPDATA%/Facespot/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("Facespot").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("Facespot").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path) -> Result<(), ModelResolveError> {
    let download_err = |source: reqwest::Error| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = dest.with_extension("part");
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| ModelResolveError::Write { path, source }
    };

    let result = fs::File::create(&temp_path)
        .and_then(|mut file| {
            io::copy(&mut response, &mut file)?;
            file.sync_all()
        })
        .map_err(write_err(&temp_path));
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, dest).map_err(write_err(dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("models", ModelLocation::Directory(PathBuf::from("models")))]
    #[case("  /opt/facespot/models ", ModelLocation::Directory(PathBuf::from("/opt/facespot/models")))]
    #[case("https://example.com/models/", ModelLocation::Remote("https://example.com/models".into()))]
    #[case("http://localhost:8080/m", ModelLocation::Remote("http://localhost:8080/m".into()))]
    fn test_parse_location(#[case] input: &str, #[case] expected: ModelLocation) {
        assert_eq!(ModelLocation::parse(input), expected);
    }

    #[test]
    fn test_resolve_local_finds_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("face.onnx");
        fs::write(&path, b"weights").unwrap();

        let location = ModelLocation::Directory(tmp.path().to_path_buf());
        assert_eq!(resolve(&location, "face.onnx").unwrap(), path);
    }

    #[test]
    fn test_resolve_local_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let location = ModelLocation::Directory(tmp.path().to_path_buf());
        let err = resolve(&location, "face.onnx").unwrap_err();
        assert!(matches!(err, ModelResolveError::NotFound(p) if p.ends_with("face.onnx")));
    }

    #[test]
    fn test_resolve_local_rejects_directory_with_model_name() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("face.onnx")).unwrap();
        let location = ModelLocation::Directory(tmp.path().to_path_buf());
        assert!(resolve(&location, "face.onnx").is_err());
    }

    #[test]
    fn test_resolve_remote_prefers_cache() {
        let cache = TempDir::new().unwrap();
        let cached = cache.path().join("face.onnx");
        fs::write(&cached, b"cached").unwrap();

        // The host is never contacted because the cache already has the file.
        let path = resolve_remote("http://127.0.0.1:9", "face.onnx", cache.path())
            .unwrap();
        assert_eq!(path, cached);
    }

    #[test]
    fn test_resolve_remote_failure_leaves_no_partial() {
        let cache = TempDir::new().unwrap();
        // Nothing listens on the discard port, so the connection is refused.
        let result = resolve_remote("http://127.0.0.1:9", "face.onnx", cache.path());
        assert!(matches!(result, Err(ModelResolveError::Download { .. })));
        assert!(!cache.path().join("face.onnx").exists());
        assert!(!cache.path().join("face.part").exists());
    }

    #[test]
    fn test_model_cache_dir_is_app_scoped() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains("Facespot"));
        assert!(path.ends_with("models"));
    }
}
