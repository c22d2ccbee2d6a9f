//! CLI argument definitions for infopages.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Version string shown by `--version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("INFOPAGES_GIT_COMMIT"),
    " ",
    env!("INFOPAGES_BUILD_TIMESTAMP"),
    ")"
);

/// Infopages - multi-page info screens with shortcuts and a page editor.
///
/// Pages live in `config.yaml` inside the data directory. Page and line
/// numbers on the command line start at 1.
#[derive(Parser, Debug)]
#[command(name = "infopages")]
#[command(author, version = LONG_VERSION, about = "Manage and preview configurable info pages", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding config.yaml and acknowledged.txt.
    /// Falls back to INFOPAGES_DATA_DIR, then the platform data directory.
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a page (the primary page by default)
    Show {
        /// Shortcut code of the page
        code: Option<String>,

        /// Page number instead of a code
        #[arg(short, long, conflicts_with = "code")]
        page: Option<usize>,
    },

    /// List the primary page lines
    List,

    /// Replace a primary page line
    Set {
        /// Line number
        line: usize,

        /// New text, optionally starting with a [#rrggbb] color
        text: String,
    },

    /// Append a line to the primary page
    Add {
        /// Line text, optionally starting with a [#rrggbb] color
        text: String,
    },

    /// Remove a primary page line
    Remove {
        /// Line number
        line: usize,
    },

    /// Edit any field of a page
    ///
    /// Fields that are not given keep their current value. Giving any
    /// --line replaces the whole body.
    Edit {
        /// Page number
        page: usize,

        #[arg(long)]
        title: Option<String>,

        /// Title color as #rrggbb
        #[arg(long)]
        title_color: Option<String>,

        /// Body line (repeatable, in order)
        #[arg(long = "line")]
        lines: Vec<String>,

        /// Color of the body line at the same position (repeatable)
        #[arg(long = "line-color")]
        line_colors: Vec<String>,

        /// Hint under the title
        #[arg(long)]
        header: Option<String>,

        #[arg(long)]
        footer: Option<String>,

        /// Confirm button label
        #[arg(long)]
        button: Option<String>,

        /// Shortcut code (empty to remove)
        #[arg(long)]
        command: Option<String>,

        /// Page opened by the button (empty to close instead)
        #[arg(long)]
        next: Option<String>,

        /// Apply without writing config.yaml
        #[arg(long)]
        no_save: bool,
    },

    /// Summarize all pages
    Pages,

    /// Write config.yaml from the current pages
    Save,

    /// Load config.yaml again
    Reload,

    /// List per-page shortcut commands
    Shortcuts,

    /// Simulate a user connecting (first-join popup)
    Ready {
        /// User id
        user: String,
    },

    /// Simulate pressing the button of a page
    Activate {
        /// Page number
        page: usize,

        /// User id
        #[arg(long, default_value = "console")]
        user: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit_with_repeated_lines() {
        let cli = Cli::parse_from([
            "infopages",
            "edit",
            "2",
            "--line",
            "one",
            "--line",
            "two",
            "--line-color",
            "#ff0000",
            "--no-save",
        ]);
        match cli.command {
            Commands::Edit {
                page,
                lines,
                line_colors,
                no_save,
                title,
                ..
            } => {
                assert_eq!(page, 2);
                assert_eq!(lines, vec!["one", "two"]);
                assert_eq!(line_colors, vec!["#ff0000"]);
                assert!(no_save);
                assert!(title.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_show_code_conflicts_with_page() {
        assert!(Cli::try_parse_from(["infopages", "show", "shop", "--page", "2"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["infopages", "list", "-H", "-D", "/tmp/pages"]);
        assert!(cli.human_readable);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/pages")));
    }
}
