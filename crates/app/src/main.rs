use std::io::{self, BufRead, Write};

use anyhow::Context;

use lendstore_app::{AppConfig, Command, CommandParseError, Outcome, Session};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    lendstore_observability::init(config.log_format);

    let mut session = Session::open(&config)
        .with_context(|| format!("failed to open catalog at {}", config.data_file.display()))?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "lendstore ready; type 'help' for commands")?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandParseError::Empty) => continue,
            Err(err) => {
                writeln!(stdout, "error: {err}")?;
                continue;
            }
        };

        match session.execute(command) {
            Ok(Outcome::Quit) => {
                writeln!(stdout, "{}", Outcome::Quit)?;
                return Ok(());
            }
            Ok(outcome) => writeln!(stdout, "{outcome}")?,
            Err(err) => writeln!(stdout, "error: {err}")?,
        }
    }

    // End of input behaves like `quit`.
    if session.is_dirty() {
        session.save().context("failed to save catalog")?;
    }
    Ok(())
}
