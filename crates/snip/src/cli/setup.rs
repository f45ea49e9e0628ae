use clap::{Parser, Subcommand};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_HASH: &str = env!("GIT_HASH");
const IS_RELEASE: &str = env!("IS_RELEASE");

/// Returns the version string, including the git hash for non-release builds.
/// Format for releases: "0.3.0"
/// Format for dev builds: "0.3.0-dev+abc1234"
pub fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            VERSION.to_string()
        } else if GIT_HASH.is_empty() {
            format!("{}-dev", VERSION)
        } else {
            format!("{}-dev+{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "snip",
    bin_name = "snip",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Tagged text snips with search and versioned edits", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file [default: snip.toml in the OS config directory]
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configured path
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub db: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a snip
    Create {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Show one snip
    Show {
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Search snips
    List {
        /// Words that must all appear in the title
        #[arg(long)]
        title: Option<String>,

        /// Comma-separated tags that must all be present
        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        page: Option<String>,

        #[arg(long)]
        page_size: Option<String>,

        /// id, title or created_at; prefix with - for descending
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,
    },

    /// Change fields of a snip
    Update {
        #[arg(allow_hyphen_values = true)]
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        /// Replace the tags (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,

        /// Only update if the snip is still at this version
        #[arg(long, value_name = "N")]
        if_version: Option<i32>,
    },

    /// Delete a snip
    Delete {
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Check the database is reachable
    Healthcheck,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_collects_repeated_tags() {
        let cli = parse(&["snip", "create", "--title", "t", "--tag", "x", "--tag", "y"]);
        match cli.command {
            Commands::Create {
                title,
                content,
                tags,
            } => {
                assert_eq!(title.as_deref(), Some("t"));
                assert_eq!(content, None);
                assert_eq!(tags, vec!["x", "y"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn list_keeps_raw_values() {
        let cli = parse(&["snip", "list", "--page", "one", "--sort", "-title"]);
        match cli.command {
            Commands::List { page, sort, .. } => {
                assert_eq!(page.as_deref(), Some("one"));
                assert_eq!(sort.as_deref(), Some("-title"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn update_rejects_tags_with_clear_tags() {
        let result = Cli::try_parse_from(["snip", "update", "1", "--tag", "x", "--clear-tags"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_options_and_negative_ids() {
        let cli = parse(&["snip", "-v", "--db", "/tmp/s.db", "show", "-3"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/s.db")));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Show { ref id } if id == "-3"));
    }

    #[test]
    fn version_starts_with_package_version() {
        assert!(get_version().starts_with(VERSION));
    }
}
