//! Interactive command interface
//!
//! This module bridges the `ABA>` prompt with the service layer: it splits
//! and parses command lines, reads secrets, and prints results.

pub mod command;
pub mod console;
pub mod dispatcher;
pub mod help;

pub use command::{split_command, tokenize, Command, CommandKind};
pub use console::Console;
pub use dispatcher::{Dispatcher, Outcome, PROMPT};
pub use help::help_text;
