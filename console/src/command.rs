//! Line-oriented user actions.

use account_core::Mode;

pub const USAGE: &str = "commands: login | register | user <name> | password <secret> | submit | logout | show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(Mode),
    Username(String),
    Password(String),
    Submit,
    Logout,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Arguments keep their inner whitespace.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim_start();
    let (word, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));
    match word {
        "login" => Ok(Command::Mode(Mode::Login)),
        "register" => Ok(Command::Mode(Mode::Register)),
        "user" => Ok(Command::Username(rest.trim().to_string())),
        "password" => Ok(Command::Password(rest.trim_end_matches(['\r', '\n']).to_string())),
        "submit" => Ok(Command::Submit),
        "logout" => Ok(Command::Logout),
        "" | "show" => Ok(Command::Show),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command `{other}`; {USAGE}")),
    }
}
