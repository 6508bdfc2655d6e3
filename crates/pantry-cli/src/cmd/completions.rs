//! `pantry completions`: shell completion scripts.

use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::Write;

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the script for `shell` into `out`, named after `command`'s binary.
pub fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    let bin_name = command.get_name().to_string();
    generate(shell, command, bin_name, out);
}

/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(args: &CompletionsArgs, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_completions(args.shell, command, &mut out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut command = clap::Command::new("pantry")
            .subcommand(clap::Command::new("add"))
            .subcommand(clap::Command::new("list"));
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut command, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("pantry"));
        assert!(script.contains("list"));
    }
}
