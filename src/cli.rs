use clap::Parser;
use std::path::PathBuf;

use crate::launch::{COMPILE_FLAGS, DEFAULT_FLAGS, TOOLCHAIN_BIN};

/// Include-expanding cache and launcher for Scala scripts
///
/// Expands `//#include` directives into a generated sibling script and hands
/// the result to the `scala` runner, regenerating it only when the sources
/// changed.
#[derive(Parser, Debug)]
#[command(name = "scala-script")]
#[command(about = "Include-expanding cache and launcher for Scala scripts", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Toolchain flags, the script file and its arguments, in invocation order
    ///
    /// Routing happens in `LaunchOptions::from_tokens`: unrecognized `-flags`
    /// must reach the toolchain untouched, so clap never sees them as flags.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

/// Print the usage banner to stderr.
///
/// This doubles as the help output, so it names every launcher flag and the
/// forwarding rule for everything else.
pub fn print_usage() {
    let name = binary_name();
    eprintln!("{} {}", name, env!("CARGO_PKG_VERSION"));
    eprintln!("usage: {} [flags] script.scala [script-args]", name);
    eprintln!("usage: {} [flags] --repl", name);
    eprintln!("  --repl      launch the interactive toolchain (no script file)");
    eprintln!(
        "  --nop       do not pass the default {} flags",
        DEFAULT_FLAGS.join(" ")
    );
    eprintln!(
        "  --comp      pass {} to keep and reuse compiled scripts",
        COMPILE_FLAGS.join(" ")
    );
    eprintln!("  -h, --help  print this message");
    eprintln!("other -flags are handed to {} unchanged", TOOLCHAIN_BIN);
}

/// Name the user invoked us by, for usage and error reporting.
pub fn binary_name() -> String {
    std::env::args_os()
        .next()
        .map(PathBuf::from)
        .and_then(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "scala-script".to_string())
}
