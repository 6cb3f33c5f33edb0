// Library interface for the scala-script launcher
// This allows integration tests and external code to use the launcher's modules

pub mod cache;
pub mod classpath;
pub mod include;
pub mod launch;
pub mod logging;
pub mod options;

// Re-export commonly used types
pub use include::{CyclicIncludeError, IncludeResolver, SourceUnit};
pub use options::{LaunchMode, LaunchOptions, UsageError};
