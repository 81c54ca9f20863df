use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the scalats binary.
#[derive(Parser, Debug)]
#[command(
    name = "scalats",
    version,
    about = "Analyze TypeScript declaration libraries for Scala.js conversion"
)]
pub struct CliArgs {
    /// Directory containing candidate library folders (npm-style layout;
    /// scoped packages in nested @scope folders).
    pub root: PathBuf,

    /// Only process the named libraries (default: everything discovered).
    #[arg(long = "lib", value_name = "NAME")]
    pub libs: Vec<String>,

    /// Libraries to skip entirely.
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignored: Vec<String>,

    /// Folder containing the bundled standard-library declaration files.
    #[arg(long)]
    pub stdlib: Option<PathBuf>,

    /// Treat unresolved lookups as fatal for the offending library.
    #[arg(long)]
    pub pedantic: bool,

    /// Path to a JSON config file; command-line flags win over it.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
