use std::path::PathBuf;

use clap::Parser;

/// dllexporter - export the public types of a .NET assembly as text, JSON or XML
#[derive(Debug, Parser)]
#[command(name = "dllexporter", version, about, long_about = None)]
pub struct Cli {
    /// Path to the .NET assembly file.
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Output format: text, json or xml. Unknown formats fall back to text.
    #[arg(value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// Write the export to this file instead of standard output.
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Additional directory searched for dependencies. May be repeated.
    #[arg(short = 's', long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positionals_and_flags() {
        let cli = Cli::try_parse_from([
            "dllexporter",
            "Library.dll",
            "json",
            "out.json",
            "-v",
            "-s",
            "lib",
            "--search-path",
            "vendor",
        ])
        .unwrap();

        assert_eq!(cli.path, Some(PathBuf::from("Library.dll")));
        assert_eq!(cli.format, "json");
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(cli.verbose);
        assert_eq!(
            cli.search_paths,
            vec![PathBuf::from("lib"), PathBuf::from("vendor")]
        );
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["dllexporter"]).unwrap();
        assert!(cli.path.is_none());
        assert_eq!(cli.format, "text");
        assert!(cli.output.is_none());
        assert!(cli.search_paths.is_empty());
    }
}
