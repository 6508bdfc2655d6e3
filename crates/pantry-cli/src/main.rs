#![forbid(unsafe_code)]

mod cmd;
mod output;
mod validate;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use pantry_core::config;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "pantry",
    author,
    version,
    about = "pantry: track what's in your pantry and when it expires",
    long_about = None
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Data file to use instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, env, and the user's preference.
    fn output_mode(&self, user_pref: Option<&str>) -> OutputMode {
        output::resolve_output_mode(self.format, self.json, user_pref)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Items",
        about = "Add an item",
        long_about = "Add an item to the pantry and save the data file.",
        after_help = "EXAMPLES:\n    # Add one bottle of oil expiring next year\n    pantry add \"Olive Oil\" --category Oils --expiry 2027-01-01\n\n    # Add 12 eggs expiring today\n    pantry add Eggs -n 12\n\n    # Emit machine-readable output\n    pantry add Rice --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Items",
        about = "List items",
        long_about = "List items with optional name search, category filter, and sort order.",
        after_help = "EXAMPLES:\n    # Soonest-expiring first (default)\n    pantry list\n\n    # Search names and filter by category\n    pantry list --search oil --category Oils\n\n    # Largest quantities first\n    pantry list --sort quantity-desc\n\n    # Emit machine-readable output\n    pantry list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Items",
        about = "List categories",
        long_about = "List the category filter options: \"All\" followed by every category in use.",
        after_help = "EXAMPLES:\n    # Show categories\n    pantry categories"
    )]
    Categories,

    #[command(
        next_help_heading = "Items",
        about = "Remove items",
        long_about = "Remove items by id, or with --match every item equal to the given values.",
        after_help = "EXAMPLES:\n    # Remove items 2 and 5\n    pantry remove 2 5\n\n    # Remove every copy of an item\n    pantry remove --match --name Beans --category Cans --expiry 2025-05-05"
    )]
    Remove(cmd::remove::RemoveArgs),

    #[command(
        next_help_heading = "Items",
        about = "Remove all items",
        long_about = "Remove all items and delete the data file.",
        after_help = "EXAMPLES:\n    # Start over\n    pantry clear"
    )]
    Clear,

    #[command(
        next_help_heading = "Data File",
        about = "Save the data file",
        long_about = "Rewrite the data file from the current item list.",
        after_help = "EXAMPLES:\n    # Normalize a hand-edited data file\n    pantry save"
    )]
    Save,

    #[command(
        next_help_heading = "Data File",
        about = "Export items as CSV",
        long_about = "Write a CSV copy of the pantry, by default to pantry_export.csv.",
        after_help = "EXAMPLES:\n    # Export to the default file\n    pantry export\n\n    # Export somewhere else\n    pantry export -o ~/backup.csv\n\n    # Pipe the CSV\n    pantry export --stdout | column -s, -t"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    pantry completions bash\n\n    # Generate zsh completions\n    pantry completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("PANTRY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "pantry=debug,info"
        } else {
            "pantry=info,warn"
        })
    });

    let format = env::var("PANTRY_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let user_config = config::load_user_config().unwrap_or_else(|e| {
        warn!("ignoring user config: {e:#}");
        config::UserConfig::default()
    });
    let output = cli.output_mode(user_config.output.as_deref());
    debug!(?output, "resolved output mode");

    let project_root = env::current_dir()?;
    let ctx = cmd::Context {
        output,
        quiet: cli.quiet,
        project_root: &project_root,
        data: cli.data.as_deref(),
    };

    match cli.command {
        Commands::Add(ref args) => cmd::add::run_add(args, &ctx),
        Commands::List(ref args) => cmd::list::run_list(args, &ctx),
        Commands::Categories => cmd::categories::run_categories(&ctx),
        Commands::Remove(ref args) => cmd::remove::run_remove(args, &ctx),
        Commands::Clear => cmd::clear::run_clear(&ctx),
        Commands::Save => cmd::save::run_save(&ctx),
        Commands::Export(ref args) => cmd::export::run_export(args, &ctx),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_before_subcommand() {
        let cli = Cli::parse_from(["pantry", "--json", "list"]);
        assert!(cli.json);
        assert!(cli.output_mode(None).is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["pantry", "list", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["pantry", "--format", "text", "list"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(Some("json")), OutputMode::Text);
    }

    #[test]
    fn quiet_and_verbose_flags() {
        let cli = Cli::parse_from(["pantry", "-q", "-v", "clear"]);
        assert!(cli.quiet);
        assert!(cli.verbose);
    }

    #[test]
    fn data_flag_is_global() {
        let cli = Cli::parse_from(["pantry", "list", "--data", "/tmp/shelf.csv"]);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/shelf.csv")));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["pantry", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn all_subcommands_parse() {
        let subcommands = [
            vec!["pantry", "add", "Milk"],
            vec!["pantry", "list"],
            vec!["pantry", "categories"],
            vec!["pantry", "remove", "1"],
            vec!["pantry", "clear"],
            vec!["pantry", "save"],
            vec!["pantry", "export"],
            vec!["pantry", "completions", "zsh"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?}: {:?}",
                args,
                result.err()
            );
        }
    }

    #[test]
    fn add_requires_a_name() {
        assert!(Cli::try_parse_from(["pantry", "add"]).is_err());
    }
}
