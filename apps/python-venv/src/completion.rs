//! Shell autocompletion

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;
use std::path::Path;

use crate::cli::Cli;
use crate::error::CliError;

/// Print how to enable autocompletion, or with `bash` the completion code.
///
/// # Errors
///
/// Fails when stdout cannot be written or the program's own location cannot
/// be determined for `absolute`.
pub fn run(bash: bool, absolute: bool) -> Result<(), CliError> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    let mut stdout = std::io::stdout();

    if bash {
        let registered = if absolute {
            std::env::current_exe()?.display().to_string()
        } else {
            name
        };
        generate(Shell::Bash, &mut command, registered, &mut stdout);
    } else {
        let full = full_program(&name);
        writeln!(stdout, "{}", instructions(&name, &full))?;
    }
    Ok(())
}

/// The command users would type, with the home directory shortened to `~`
fn full_program(name: &str) -> String {
    let Ok(exe) = std::env::current_exe() else {
        return name.to_string();
    };
    match dirs::home_dir() {
        Some(home) => contract_home(&exe, &home),
        None => exe.display().to_string(),
    }
}

fn contract_home(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) => Path::new("~").join(rest).display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

fn instructions(name: &str, full: &str) -> String {
    format!(
        "
{name} supports tab completion in Bash and compatible shells.

To enable it, add this line to ~/.bashrc or ~/.bash_profile (or the
equivalent file of your shell):

    eval \"$({full} completion --bash)\"

To see the code that line evaluates, run:

    {full} completion --bash
"
    )
}
