use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Resolves the configured images-root expression to an absolute path.
///
/// A leading `.` component stands for the executable's own directory
/// (`"./images"` -> `<exe_dir>/images`); any other path is used as given.
pub fn resolve_images_root(expr: &str) -> PathBuf {
    resolve_relative_to(expr, get_exe_dir())
}

fn resolve_relative_to(expr: &str, base: &Path) -> PathBuf {
    match expr.strip_prefix("./") {
        Some(rest) => base.join(rest),
        None if expr == "." => base.to_path_buf(),
        None => PathBuf::from(expr),
    }
}

/// Ensures the logs directory exists. Call at startup.
///
/// The images folder skeleton is deliberately NOT created here; the saver
/// treats a missing skeleton as a fatal configuration error.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exe_relative() {
        let base = Path::new("/opt/tool");

        assert_eq!(
            resolve_relative_to("./images", base),
            PathBuf::from("/opt/tool/images")
        );
        assert_eq!(resolve_relative_to(".", base), PathBuf::from("/opt/tool"));
    }

    #[test]
    fn test_resolve_absolute_passes_through() {
        let base = Path::new("/opt/tool");

        assert_eq!(
            resolve_relative_to("/data/images", base),
            PathBuf::from("/data/images")
        );
    }
}
