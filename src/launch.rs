/// Toolchain invocation
///
/// Owns the flag families the launcher injects and the final hand-off of
/// the process to the `scala` runner.
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::options::LaunchOptions;

/// Binary the launcher hands control to
pub const TOOLCHAIN_BIN: &str = "scala";

/// Strictness flags passed unless --nop is given
pub const DEFAULT_FLAGS: [&str; 2] = ["-deprecation", "-feature"];

/// Compilation flags added by --comp
pub const COMPILE_FLAGS: [&str; 2] = ["-savecompiled", "-nc"];

/// System property carrying the launched script's name
const SCRIPT_NAME_PROPERTY: &str = "-Dscala.script.name=";

/// Faults in the hand-off itself
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{name} not found on PATH")]
    ToolchainNotFound {
        name: &'static str,
        #[source]
        source: which::Error,
    },
    #[error("failed to launch {}", .program.display())]
    Transfer {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Locate the toolchain binary on PATH.
pub fn locate_toolchain() -> Result<PathBuf, LaunchError> {
    which::which(TOOLCHAIN_BIN).map_err(|source| LaunchError::ToolchainNotFound {
        name: TOOLCHAIN_BIN,
        source,
    })
}

/// Assemble the toolchain argument vector.
///
/// Order: default flags, compile flags, pass-through flags, classpath,
/// script-name property, the target file (script mode only), script
/// arguments.
pub fn toolchain_args(
    options: &LaunchOptions,
    classpath: &str,
    script_name: &Path,
    target: Option<&Path>,
) -> Vec<String> {
    let mut args = Vec::new();
    if !options.no_default_flags {
        args.extend(DEFAULT_FLAGS.iter().map(|flag| flag.to_string()));
    }
    if options.compile_mode {
        args.extend(COMPILE_FLAGS.iter().map(|flag| flag.to_string()));
    }
    args.extend(options.toolchain_flags.iter().cloned());
    args.push("-classpath".to_string());
    args.push(classpath.to_string());
    args.push(format!("{}{}", SCRIPT_NAME_PROPERTY, script_name.display()));
    if let Some(target) = target {
        args.push(target.display().to_string());
    }
    args.extend(options.script_args.iter().cloned());
    args
}

/// Hand control to the toolchain.
///
/// The process image is replaced, so this only ever returns on failure.
#[cfg(unix)]
pub fn transfer(program: &Path, args: &[String]) -> Result<Infallible, LaunchError> {
    use std::os::unix::process::CommandExt;

    tracing::debug!("command: {} {}", program.display(), args.join(" "));
    let err = Command::new(program).args(args).exec();
    Err(LaunchError::Transfer {
        program: program.to_path_buf(),
        source: err,
    })
}

/// Hand control to the toolchain.
///
/// Without exec the toolchain runs as a child with inherited stdio and its
/// exit status becomes ours.
#[cfg(not(unix))]
pub fn transfer(program: &Path, args: &[String]) -> Result<Infallible, LaunchError> {
    tracing::debug!("command: {} {}", program.display(), args.join(" "));
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| LaunchError::Transfer {
            program: program.to_path_buf(),
            source,
        })?;
    std::process::exit(status.code().unwrap_or(1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LaunchMode;

    fn script_options() -> LaunchOptions {
        LaunchOptions {
            mode: LaunchMode::Script {
                path: PathBuf::from("x.scala"),
            },
            no_default_flags: false,
            compile_mode: false,
            toolchain_flags: Vec::new(),
            script_args: Vec::new(),
        }
    }

    #[test]
    fn test_script_invocation_argument_order() {
        let options = script_options();
        let artifact = Path::new("/w/.g.x.scala");

        let args = toolchain_args(&options, "CP", artifact, Some(artifact));

        assert_eq!(
            args,
            vec![
                "-deprecation",
                "-feature",
                "-classpath",
                "CP",
                "-Dscala.script.name=/w/.g.x.scala",
                "/w/.g.x.scala",
            ]
        );
    }

    #[test]
    fn test_nop_suppresses_default_flags() {
        let mut options = script_options();
        options.no_default_flags = true;

        let args = toolchain_args(&options, "CP", Path::new("/w/.g.x.scala"), None);

        assert_eq!(args[0], "-classpath");
        assert!(!args.iter().any(|arg| arg == "-deprecation"));
    }

    #[test]
    fn test_comp_flags_sit_between_defaults_and_passthrough() {
        let mut options = script_options();
        options.compile_mode = true;
        options.toolchain_flags = vec!["-explain".to_string()];

        let args = toolchain_args(&options, "CP", Path::new("/w/.g.x.scala"), None);

        assert_eq!(
            &args[..5],
            &[
                "-deprecation",
                "-feature",
                "-savecompiled",
                "-nc",
                "-explain"
            ]
        );
    }

    #[test]
    fn test_repl_invocation_has_no_target() {
        let options = LaunchOptions {
            mode: LaunchMode::Repl,
            no_default_flags: false,
            compile_mode: false,
            toolchain_flags: Vec::new(),
            script_args: Vec::new(),
        };

        let args = toolchain_args(&options, "CP", Path::new("/work"), None);

        assert_eq!(args.last().unwrap(), "-Dscala.script.name=/work");
    }

    #[test]
    fn test_script_arguments_trail_the_vector() {
        let mut options = script_options();
        options.script_args = vec!["first".to_string(), "--second".to_string()];

        let args = toolchain_args(
            &options,
            "CP",
            Path::new("/w/.g.x.scala"),
            Some(Path::new("/w/.g.x.scala")),
        );

        assert_eq!(&args[args.len() - 2..], &["first", "--second"]);
    }
}
