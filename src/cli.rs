use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Command {
    Post,
    List,
}

#[derive(Parser, Debug, Default)]
#[command(
    about = concat!(env!("CARGO_CRATE_NAME"), " - minimalistic news feed client"),
    disable_help_flag = true
)]
pub struct Flags {
    /// run a one-shot command instead of the interactive feed
    #[arg(default_value = None)]
    pub command: Option<Command>,
}

impl Flags {
    /// Parse from `std::env::args_os()`, [exit][Error::exit] on error.
    // Wraps `clap::Parser` logic without direct trait imports
    // Equivalent to `Flags::parse()` here
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Check if the command is "post"
    pub fn post(&self) -> bool {
        matches!(self.command, Some(Command::Post))
    }

    /// Check if the command is "list"
    pub fn list(&self) -> bool {
        matches!(self.command, Some(Command::List))
    }
}
