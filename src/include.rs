/// Include resolution for script sources
///
/// Discovers `//#include` directives recursively and splices the included
/// file bodies into the including text, bottom-up. Each included file
/// becomes an owned node in the resulting dependency tree.
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Line marker that pulls another file in
const DIRECTIVE: &str = "//#include";

/// A file includes itself through a chain of directives.
#[derive(Debug, Error)]
#[error("cyclic include: {}", format_chain(.chain))]
pub struct CyclicIncludeError {
    /// Canonical paths from the root file down to the repeated one
    pub chain: Vec<PathBuf>,
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// One file in the include tree
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Name as written in the directive (or on the command line, for the root)
    pub logical_name: String,
    /// Canonical directory holding the file
    pub directory: PathBuf,
    /// File name on disk
    pub base_name: String,
    /// Fully expanded text
    pub body: String,
    /// One unit per directive, in source order
    pub children: Vec<SourceUnit>,
}

impl SourceUnit {
    /// Path of the file this unit was loaded from.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.base_name)
    }
}

/// Recursive include loader
///
/// Keeps the chain of files currently being expanded; re-entering one of
/// them is a cycle. Duplicate includes outside the live chain are legal and
/// resolve independently.
pub struct IncludeResolver {
    in_progress: Vec<PathBuf>,
}

impl Default for IncludeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IncludeResolver {
    pub fn new() -> Self {
        Self {
            in_progress: Vec::new(),
        }
    }

    /// Load `file_name` relative to `working_dir` and expand every include.
    ///
    /// Includes resolve relative to the directory of the file naming them,
    /// so `working_dir` shifts as the recursion descends.
    pub fn resolve(&mut self, working_dir: &Path, file_name: &Path) -> Result<SourceUnit> {
        let joined = working_dir.join(file_name);
        let abs_path = joined
            .canonicalize()
            .with_context(|| format!("Failed to locate source: {}", joined.display()))?;

        if self.in_progress.contains(&abs_path) {
            let mut chain = self.in_progress.clone();
            chain.push(abs_path);
            return Err(CyclicIncludeError { chain }.into());
        }

        let directory = abs_path
            .parent()
            .ok_or_else(|| anyhow!("Source has no parent directory: {}", abs_path.display()))?
            .to_path_buf();
        let base_name = abs_path
            .file_name()
            .ok_or_else(|| anyhow!("Source has no file name: {}", abs_path.display()))?
            .to_string_lossy()
            .into_owned();

        let raw = fs::read_to_string(&abs_path)
            .with_context(|| format!("Failed to read source: {}", abs_path.display()))?;

        self.in_progress.push(abs_path);
        let children = self.resolve_children(&directory, &raw);
        self.in_progress.pop();
        let children = children?;

        let body = substitute(&raw, &children);

        Ok(SourceUnit {
            logical_name: file_name.display().to_string(),
            directory,
            base_name,
            body,
            children,
        })
    }

    /// First pass: resolve one child per directive line, in source order.
    fn resolve_children(&mut self, directory: &Path, text: &str) -> Result<Vec<SourceUnit>> {
        let mut children = Vec::new();
        for line in text.lines() {
            if let Some(name) = directive_name(line) {
                children.push(self.resolve(directory, Path::new(name))?);
            }
        }
        Ok(children)
    }
}

/// Parse one line as an include directive, returning the included name.
///
/// The marker must be followed by whitespace; the remainder of the line,
/// trimmed, is the name. A bare marker or a marker glued to other text is
/// not a directive.
fn directive_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(DIRECTIVE)?;
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let name = rest.trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Second pass: replace every directive line naming a child with that
/// child's already expanded body.
fn substitute(text: &str, children: &[SourceUnit]) -> String {
    let mut bodies: HashMap<&str, &str> = HashMap::new();
    for child in children {
        bodies
            .entry(child.logical_name.as_str())
            .or_insert(child.body.as_str());
    }

    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        match directive_name(line).and_then(|name| bodies.get(name)) {
            // The body's final newline is dropped so the splice sits exactly
            // where the directive line sat.
            Some(body) => out.push_str(body.strip_suffix('\n').unwrap_or(body)),
            None => out.push_str(line),
        }
        out.push('\n');
    }
    if !text.ends_with('\n') {
        out.pop();
    }
    out
}
