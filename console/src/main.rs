//! Terminal host for the account demo client.
//!
//! Reads one command per line, executes the controller's calls one at a
//! time and prints the rendered screen after every action. Logs go to
//! stderr so they never interleave with the screen.

mod command;
mod config;
mod transport;

use std::io::{self, BufRead, Write};

use account_core::{render, AccountClient, Controller};
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use command::{Command, USAGE};
use config::Config;
use transport::Transport;

fn main() -> Result<()> {
    let config = Config::from_matches(&config::new().get_matches())?;
    init_tracing(&config);
    tracing::info!(base_url = %config.base_url, "starting console");

    let transport = Transport::new();
    let mut ui = Controller::new(AccountClient::new(&config.base_url));

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{USAGE}")?;
    draw(&mut stdout, &ui)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(stdout, "{USAGE}")?,
            Ok(command) => {
                apply(&mut ui, &transport, command);
                draw(&mut stdout, &ui)?;
            }
            Err(hint) => writeln!(stdout, "{hint}")?,
        }
    }
    Ok(())
}

fn apply(ui: &mut Controller, transport: &Transport, command: Command) {
    match command {
        Command::Mode(mode) => ui.set_mode(mode),
        Command::Username(username) => ui.set_username(username),
        Command::Password(password) => ui.set_password(password),
        Command::Submit => {
            let call = ui.submit();
            ui.run(call, |req| transport.execute(req));
        }
        Command::Logout => {
            let call = ui.logout();
            if call.is_none() {
                tracing::debug!("logout ignored, not logged in");
            }
            ui.run(call, |req| transport.execute(req));
        }
        Command::Show | Command::Help | Command::Quit => {}
    }
}

fn draw(out: &mut impl Write, ui: &Controller) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "{}", render(ui.state()))?;
    write!(out, "> ")?;
    out.flush()
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
