//! Arguments of the `sidecar` binary.
//!
//! Global options override `sidecar.toml` and come before the subcommand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Page data loader CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory; no data is read outside it
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: sidecar.toml)
    #[arg(short = 'C', long, default_value = "sidecar.toml")]
    pub config: PathBuf,

    /// Source directory holding `html/` and `data/` (relative to project root)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Page template directory (relative to project root)
    #[arg(long)]
    pub html: Option<String>,

    /// Data directory (relative to project root)
    #[arg(long)]
    pub data: Option<String>,

    /// Key page data is exposed under
    #[arg(short, long)]
    pub entry: Option<String>,

    /// Locale for report timestamps
    #[arg(long)]
    pub locale: Option<String>,

    /// Do not report loaded and cached files
    #[arg(short, long)]
    pub quiet: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load the given pages and print their data as JSON
    Load {
        /// Page template paths, relative to the template directory or absolute
        #[arg(required = true)]
        pages: Vec<PathBuf>,
    },

    /// Load every page in the template directory
    Build {
        /// Write each page's data as JSON into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration and print resolved directories
    Check,
}

#[allow(unused)]
impl Cli {
    pub const fn is_load(&self) -> bool {
        matches!(self.command, Commands::Load { .. })
    }
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load() {
        let cli = Cli::parse_from(["sidecar", "load", "about.pug", "blog/post.pug"]);
        assert!(cli.is_load());
        match cli.command {
            Commands::Load { pages } => {
                assert_eq!(pages, vec![PathBuf::from("about.pug"), PathBuf::from("blog/post.pug")]);
            }
            _ => unreachable!(),
        }
        assert_eq!(cli.config, PathBuf::from("sidecar.toml"));
    }

    #[test]
    fn test_parse_build_with_output() {
        let cli = Cli::parse_from(["sidecar", "-r", "site", "build", "-o", "dist/data"]);
        assert!(cli.is_build());
        assert_eq!(cli.root, Some(PathBuf::from("site")));
        match cli.command {
            Commands::Build { output } => assert_eq!(output, Some(PathBuf::from("dist/data"))),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_load_requires_pages() {
        assert!(Cli::try_parse_from(["sidecar", "load"]).is_err());
    }
}
