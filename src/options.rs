/// Invocation routing for the launcher
///
/// The whole command line arrives as one raw token list because unrecognized
/// `-tokens` must reach the toolchain unchanged. Scanning stops at the first
/// bare token, which names the script; everything after it belongs to the
/// script itself.
use std::path::PathBuf;
use thiserror::Error;

/// Faults in the command line itself, reported alongside the usage text.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("no arguments given")]
    NoArguments,
    #[error("help requested")]
    Help,
    #[error("--repl and a script file are mutually exclusive: {0}")]
    ReplWithScript(String),
    #[error("no script file given")]
    MissingScript,
    #[error("script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),
}

/// What to launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMode {
    /// Interactive toolchain session rooted at the working directory
    Repl,
    /// Run a script file, as written on the command line
    Script { path: PathBuf },
}

/// Fully routed command line
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub mode: LaunchMode,
    /// Suppress the default strictness flags
    pub no_default_flags: bool,
    /// Ask the toolchain to keep compiled scripts
    pub compile_mode: bool,
    /// Unrecognized `-tokens`, forwarded to the toolchain in command-line order
    pub toolchain_flags: Vec<String>,
    /// Everything after the script file, forwarded verbatim
    pub script_args: Vec<String>,
}

impl LaunchOptions {
    /// Route the raw token list into launch options.
    pub fn from_tokens(tokens: &[String]) -> Result<Self, UsageError> {
        if tokens.is_empty() {
            return Err(UsageError::NoArguments);
        }

        let mut repl = false;
        let mut no_default_flags = false;
        let mut compile_mode = false;
        let mut toolchain_flags = Vec::new();
        let mut script: Option<PathBuf> = None;

        let mut iter = tokens.iter();
        for token in iter.by_ref() {
            match token.as_str() {
                "--repl" => repl = true,
                "--nop" => no_default_flags = true,
                "--comp" => compile_mode = true,
                "-h" | "--help" => return Err(UsageError::Help),
                flag if flag.starts_with('-') => toolchain_flags.push(flag.to_string()),
                name => {
                    if repl {
                        return Err(UsageError::ReplWithScript(name.to_string()));
                    }
                    script = Some(PathBuf::from(name));
                    break;
                }
            }
        }
        let script_args: Vec<String> = iter.cloned().collect();

        let mode = match script {
            Some(path) => {
                if !path.exists() {
                    return Err(UsageError::ScriptNotFound(path));
                }
                LaunchMode::Script { path }
            }
            None if repl => LaunchMode::Repl,
            None => return Err(UsageError::MissingScript),
        };

        Ok(Self {
            mode,
            no_default_flags,
            compile_mode,
            toolchain_flags,
            script_args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Creates a script on disk and returns its absolute path as a token.
    fn script_token(temp: &TempDir, name: &str) -> String {
        let path = temp.path().join(name);
        fs::write(&path, "println(1)\n").unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_empty_token_list_is_rejected() {
        let err = LaunchOptions::from_tokens(&[]).unwrap_err();
        assert!(matches!(err, UsageError::NoArguments));
    }

    #[test]
    fn test_help_flags_short_circuit() {
        let err = LaunchOptions::from_tokens(&tokens(&["-h"])).unwrap_err();
        assert!(matches!(err, UsageError::Help));

        let err = LaunchOptions::from_tokens(&tokens(&["--nop", "--help"])).unwrap_err();
        assert!(matches!(err, UsageError::Help));
    }

    #[test]
    fn test_repl_alone_selects_repl_mode() {
        let options = LaunchOptions::from_tokens(&tokens(&["--repl"])).unwrap();
        assert_eq!(options.mode, LaunchMode::Repl);
        assert!(options.toolchain_flags.is_empty());
        assert!(options.script_args.is_empty());
    }

    #[test]
    fn test_repl_with_script_is_rejected() {
        let err = LaunchOptions::from_tokens(&tokens(&["--repl", "x.scala"])).unwrap_err();
        match err {
            UsageError::ReplWithScript(name) => assert_eq!(name, "x.scala"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_flags_without_script_are_rejected() {
        let err = LaunchOptions::from_tokens(&tokens(&["--nop", "-explain"])).unwrap_err();
        assert!(matches!(err, UsageError::MissingScript));
    }

    #[test]
    fn test_missing_script_file_is_rejected() {
        let err = LaunchOptions::from_tokens(&tokens(&["ghost.scala"])).unwrap_err();
        match err {
            UsageError::ScriptNotFound(path) => assert_eq!(path, PathBuf::from("ghost.scala")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_flags_pass_through_in_order() {
        let temp = TempDir::new().unwrap();
        let script = script_token(&temp, "main.scala");

        let options = LaunchOptions::from_tokens(&tokens(&[
            "-explain",
            "--nop",
            "-J-Xmx1g",
            &script,
            "arg1",
        ]))
        .unwrap();

        assert!(options.no_default_flags);
        assert_eq!(options.toolchain_flags, vec!["-explain", "-J-Xmx1g"]);
        assert_eq!(options.script_args, vec!["arg1"]);
        assert_eq!(
            options.mode,
            LaunchMode::Script {
                path: PathBuf::from(&script)
            }
        );
    }

    #[test]
    fn test_comp_flag_is_recognized() {
        let temp = TempDir::new().unwrap();
        let script = script_token(&temp, "main.scala");

        let options = LaunchOptions::from_tokens(&tokens(&["--comp", &script])).unwrap();
        assert!(options.compile_mode);
        assert!(!options.no_default_flags);
    }

    #[test]
    fn test_tokens_after_script_are_kept_verbatim() {
        let temp = TempDir::new().unwrap();
        let script = script_token(&temp, "main.scala");

        let options =
            LaunchOptions::from_tokens(&tokens(&[&script, "--repl", "-h", "--comp"])).unwrap();

        // Nothing after the script is interpreted, not even our own flags
        assert!(!options.compile_mode);
        assert_eq!(options.script_args, vec!["--repl", "-h", "--comp"]);
    }
}
