//! Command-line parsing for the interactive prompt
//!
//! A line is split into words (quotes group words, backslash escapes) and
//! the first word names the command, either by its three-letter code or
//! its long name, in any case.

use std::path::PathBuf;

use crate::error::{AbaError, AbaResult};
use crate::services::OperationClass;

/// Split a command line into words
///
/// Single quotes keep everything literally, double quotes allow `\"` and
/// `\\`, and outside quotes a backslash escapes the next character.
pub fn tokenize(line: &str) -> AbaResult<Vec<String>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Quote {
        None,
        Single,
        Double,
    }

    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote = Quote::None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Quote::Single, '\'') | (Quote::Double, '"') => quote = Quote::None,
            (Quote::Single, c) => word.push(c),
            (Quote::Double, '\\') => match chars.next() {
                Some(next @ ('"' | '\\')) => word.push(next),
                Some(next) => {
                    word.push('\\');
                    word.push(next);
                }
                None => return Err(missing_close_quote()),
            },
            (Quote::Double, c) => word.push(c),
            (Quote::None, '\'') => {
                quote = Quote::Single;
                in_word = true;
            }
            (Quote::None, '"') => {
                quote = Quote::Double;
                in_word = true;
            }
            (Quote::None, '\\') => {
                let next = chars
                    .next()
                    .ok_or_else(|| AbaError::Validation("No escaped character".into()))?;
                word.push(next);
                in_word = true;
            }
            (Quote::None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (Quote::None, c) => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if quote != Quote::None {
        return Err(missing_close_quote());
    }
    if in_word {
        words.push(word);
    }

    Ok(words)
}

fn missing_close_quote() -> AbaError {
    AbaError::Validation("Missing close-quote".into())
}

fn bad_arity() -> AbaError {
    AbaError::Validation("Missing or extra parameters".into())
}

/// Every command the prompt understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Login,
    Logout,
    ChangePassword,
    AddUser,
    DeleteUser,
    ListUsers,
    ReadAudit,
    ClearAudit,
    AddRecord,
    DeleteRecord,
    EditRecord,
    ReadRecord,
    ReadAllRecords,
    Import,
    Export,
    WhoAmI,
    Help,
    Exit,
}

impl CommandKind {
    /// In help order
    pub const ALL: [CommandKind; 18] = [
        Self::Login,
        Self::Logout,
        Self::ChangePassword,
        Self::AddRecord,
        Self::DeleteRecord,
        Self::EditRecord,
        Self::ReadRecord,
        Self::ReadAllRecords,
        Self::Import,
        Self::Export,
        Self::Help,
        Self::WhoAmI,
        Self::Exit,
        Self::AddUser,
        Self::DeleteUser,
        Self::ListUsers,
        Self::ReadAudit,
        Self::ClearAudit,
    ];

    /// Three-letter code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Login => "LIN",
            Self::Logout => "LOU",
            Self::ChangePassword => "CHP",
            Self::AddUser => "ADU",
            Self::DeleteUser => "DEU",
            Self::ListUsers => "LSU",
            Self::ReadAudit => "RAL",
            Self::ClearAudit => "DAL",
            Self::AddRecord => "ADR",
            Self::DeleteRecord => "DER",
            Self::EditRecord => "EDR",
            Self::ReadRecord => "RER",
            Self::ReadAllRecords => "REA",
            Self::Import => "IMD",
            Self::Export => "EXD",
            Self::WhoAmI => "WAI",
            Self::Help => "HLP",
            Self::Exit => "EXT",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::ChangePassword => "change-password",
            Self::AddUser => "add-user",
            Self::DeleteUser => "delete-user",
            Self::ListUsers => "list-users",
            Self::ReadAudit => "read-audit",
            Self::ClearAudit => "clear-audit",
            Self::AddRecord => "add-record",
            Self::DeleteRecord => "delete-record",
            Self::EditRecord => "edit-record",
            Self::ReadRecord => "read-record",
            Self::ReadAllRecords => "read-all-records",
            Self::Import => "import",
            Self::Export => "export",
            Self::WhoAmI => "who-am-i",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }

    /// Look up a command by code or long name, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            kind.code().eq_ignore_ascii_case(name) || kind.long_name().eq_ignore_ascii_case(name)
        })
    }

    /// Which sessions may run this command
    pub fn operation_class(&self) -> OperationClass {
        match self {
            Self::AddUser | Self::DeleteUser | Self::ListUsers | Self::ReadAudit | Self::ClearAudit => {
                OperationClass::AdminOnly
            }
            Self::AddRecord
            | Self::DeleteRecord
            | Self::EditRecord
            | Self::ReadRecord
            | Self::ReadAllRecords
            | Self::Import
            | Self::Export => OperationClass::UserRecordOnly,
            Self::Logout | Self::ChangePassword => OperationClass::AuthenticatedAny,
            Self::Login | Self::WhoAmI | Self::Help | Self::Exit => {
                OperationClass::UnauthenticatedAllowed
            }
        }
    }
}

/// A parsed command with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String),
    Logout,
    ChangePassword,
    AddUser(String),
    DeleteUser(String),
    ListUsers,
    ReadAudit(Option<String>),
    ClearAudit,
    AddRecord {
        record_id: String,
        assignments: Vec<String>,
    },
    DeleteRecord(String),
    EditRecord {
        record_id: String,
        assignments: Vec<String>,
    },
    ReadRecord {
        record_id: String,
        fields: Vec<String>,
    },
    ReadAllRecords {
        fields: Vec<String>,
    },
    Import(PathBuf),
    Export(PathBuf),
    WhoAmI,
    Help,
    Exit,
}

impl Command {
    /// Build a command from its kind and the words after the name
    pub fn from_args(kind: CommandKind, args: Vec<String>) -> AbaResult<Self> {
        let mut args = args.into_iter();

        let command = match kind {
            CommandKind::Login => Self::Login(exactly_one(args)?),
            CommandKind::Logout => none(args, Self::Logout)?,
            CommandKind::ChangePassword => none(args, Self::ChangePassword)?,
            CommandKind::AddUser => Self::AddUser(exactly_one(args)?),
            CommandKind::DeleteUser => Self::DeleteUser(exactly_one(args)?),
            CommandKind::ListUsers => none(args, Self::ListUsers)?,
            CommandKind::ReadAudit => {
                let target = args.next();
                none(args, Self::ReadAudit(target))?
            }
            CommandKind::ClearAudit => none(args, Self::ClearAudit)?,
            CommandKind::AddRecord => Self::AddRecord {
                record_id: args.next().ok_or_else(bad_arity)?,
                assignments: args.collect(),
            },
            CommandKind::DeleteRecord => Self::DeleteRecord(exactly_one(args)?),
            CommandKind::EditRecord => {
                let record_id = args.next().ok_or_else(bad_arity)?;
                let assignments: Vec<String> = args.collect();
                if assignments.is_empty() {
                    return Err(bad_arity());
                }
                Self::EditRecord {
                    record_id,
                    assignments,
                }
            }
            CommandKind::ReadRecord => Self::ReadRecord {
                record_id: args.next().ok_or_else(bad_arity)?,
                fields: args.collect(),
            },
            CommandKind::ReadAllRecords => Self::ReadAllRecords {
                fields: args.collect(),
            },
            CommandKind::Import => Self::Import(exactly_one(args)?.into()),
            CommandKind::Export => Self::Export(exactly_one(args)?.into()),
            CommandKind::WhoAmI => none(args, Self::WhoAmI)?,
            CommandKind::Help => none(args, Self::Help)?,
            CommandKind::Exit => none(args, Self::Exit)?,
        };

        Ok(command)
    }
}

fn exactly_one(mut args: impl Iterator<Item = String>) -> AbaResult<String> {
    let first = args.next().ok_or_else(bad_arity)?;
    none(args, first)
}

fn none<T>(mut args: impl Iterator<Item = String>, value: T) -> AbaResult<T> {
    match args.next() {
        Some(_) => Err(bad_arity()),
        None => Ok(value),
    }
}

/// Split a line into its command kind and arguments
///
/// Returns `None` for a blank line.
pub fn split_command(line: &str) -> AbaResult<Option<(CommandKind, Vec<String>)>> {
    let mut words = tokenize(line)?.into_iter();

    let Some(name) = words.next() else {
        return Ok(None);
    };
    let kind = CommandKind::parse(&name)
        .ok_or_else(|| AbaError::Validation("Unrecognized command".into()))?;

    Ok(Some((kind, words.collect())))
}
