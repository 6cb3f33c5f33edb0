/// Classpath assembly for the toolchain invocation
///
/// Bundled jars live in `lib/` under the classpath root; the root itself is
/// always the final entry. The result is recomputed on every launch and
/// never persisted.
use std::fs;
use std::path::Path;

/// Platform path-list separator for -classpath
pub const PATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// Compose the classpath for `root`.
///
/// Jars directly under `root/lib` are listed name-sorted, then the root
/// closes the list. A missing or unreadable `lib` folder degrades to the
/// root alone; it is not an error.
pub fn build(root: &Path) -> String {
    tracing::debug!("class path root: {}", root.display());

    let mut jars = Vec::new();
    if let Ok(listing) = fs::read_dir(root.join("lib")) {
        for entry in listing.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("jar") {
                jars.push(path);
            }
        }
        jars.sort();
    }

    let mut parts: Vec<String> = jars.iter().map(|jar| jar.display().to_string()).collect();
    parts.push(root.display().to_string());
    parts.join(PATH_SEPARATOR)
}
