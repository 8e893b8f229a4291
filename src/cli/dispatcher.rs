//! Command dispatcher
//!
//! Reads a line, checks it against the authorization gate, runs it, and
//! prints `OK` followed by any output, or the error message. Every failure
//! ends only the command that caused it.

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::display::{format_audit_entries, format_record_list, format_user_list};
use crate::error::{AbaError, AbaResult};
use crate::export::export_user_records;
use crate::services::{authorize, AdminService, RecordService, SecretPrompt, SessionManager};
use crate::storage::{ShutdownReport, Storage};

use super::command::{split_command, Command};
use super::console::{decode_line, Console};
use super::help::help_text;

pub const PROMPT: &str = "ABA> ";

/// What a successful command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Finished, with optional text to show after `OK`
    Done(Option<String>),
    /// The operator asked to leave
    Exit,
}

/// Owns the stores and the session for one interactive run
pub struct Dispatcher {
    storage: Storage,
    session: SessionManager,
}

impl Dispatcher {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            session: SessionManager::new(),
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Parse, authorize and run one line
    ///
    /// Returns `None` for a blank line.
    pub fn dispatch(
        &mut self,
        line: &str,
        prompt: &mut dyn SecretPrompt,
    ) -> AbaResult<Option<Outcome>> {
        let Some((kind, args)) = split_command(line)? else {
            return Ok(None);
        };
        debug!(command = kind.code(), "Dispatching command");

        authorize(&self.session, kind.operation_class()).map_err(AbaError::Authorization)?;
        let command = Command::from_args(kind, args)?;

        self.execute(command, prompt).map(Some)
    }

    fn execute(&mut self, command: Command, prompt: &mut dyn SecretPrompt) -> AbaResult<Outcome> {
        let payload = match command {
            Command::Login(user) => {
                self.session.login(&mut self.storage, prompt, &user)?;
                None
            }
            Command::Logout => {
                self.session.logout(&mut self.storage)?;
                None
            }
            Command::ChangePassword => {
                self.session.change_password(&mut self.storage, prompt)?;
                None
            }
            Command::AddUser(user) => {
                AdminService::new(&mut self.storage).add_user(&user)?;
                None
            }
            Command::DeleteUser(user) => {
                AdminService::new(&mut self.storage).delete_user(&user)?;
                None
            }
            Command::ListUsers => {
                let users = AdminService::new(&mut self.storage).list_users()?;
                Some(format_user_list(&users))
            }
            Command::ReadAudit(target) => {
                let entries = AdminService::new(&mut self.storage).read_audit(target.as_deref())?;
                (!entries.is_empty()).then(|| format_audit_entries(&entries))
            }
            Command::ClearAudit => {
                AdminService::new(&mut self.storage).clear_audit()?;
                None
            }
            Command::AddRecord {
                record_id,
                assignments,
            } => {
                self.records()?.add(&record_id, &assignments)?;
                None
            }
            Command::DeleteRecord(record_id) => {
                self.records()?.delete(&record_id)?;
                None
            }
            Command::EditRecord {
                record_id,
                assignments,
            } => {
                self.records()?.edit(&record_id, &assignments)?;
                None
            }
            Command::ReadRecord { record_id, fields } => {
                let views = self.records()?.read(&record_id, &fields)?;
                Some(format_record_list(&views))
            }
            Command::ReadAllRecords { fields } => {
                let views = self.records()?.read_all(&fields)?;
                Some(format_record_list(&views))
            }
            Command::Import(path) => {
                let summary = self.records()?.import(&path)?;
                Some(format!(
                    "Imported {} records ({} new, {} replaced)",
                    summary.total(),
                    summary.inserted,
                    summary.replaced
                ))
            }
            Command::Export(path) => {
                let owner = self.session.require_user()?.id.clone();
                let count = export_user_records(&self.storage, &owner, &path)?;
                Some(format!("Exported {} records to {}", count, path.display()))
            }
            Command::WhoAmI => Some(match self.session.current() {
                Some(user) => format!("Current user is {}", user),
                None => "No user is logged in".to_string(),
            }),
            Command::Help => Some(help_text()),
            Command::Exit => return Ok(Outcome::Exit),
        };

        Ok(Outcome::Done(payload))
    }

    fn records(&mut self) -> AbaResult<RecordService<'_>> {
        let owner = self.session.require_user()?.id.clone();
        Ok(RecordService::new(&mut self.storage, owner))
    }

    /// Run until `exit` or end of input, then shut the stores down
    ///
    /// The stores are closed even when the console itself fails.
    pub fn run<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> AbaResult<()> {
        let result = self.command_loop(console);

        let report = self.shutdown();
        if report.is_clean() {
            console.say("OK")?;
        } else {
            for (store, e) in report.failures() {
                console.say(&format!("Failed to close {}: {}", store, e))?;
            }
        }
        console.say("Exiting ...")?;

        result
    }

    fn command_loop<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> AbaResult<()> {
        console.say(&format!(
            "aba {}. Type \"help\" for a list of commands.",
            env!("CARGO_PKG_VERSION")
        ))?;

        while let Some(raw) = console.read_raw_line(PROMPT)? {
            let result = decode_line(raw).and_then(|line| self.dispatch(&line, console));
            match result {
                Ok(None) => continue,
                Ok(Some(Outcome::Done(payload))) => {
                    console.say("OK")?;
                    if let Some(text) = payload {
                        console.say(&text)?;
                    }
                }
                Ok(Some(Outcome::Exit)) => break,
                Err(e) => {
                    warn!(error = %e, kind = ?e.kind(), "Command failed");
                    console.say(&e.to_string())?;
                }
            }
        }

        Ok(())
    }

    /// Close every store; see [`Storage::shutdown`]
    pub fn shutdown(&mut self) -> ShutdownReport {
        self.storage.shutdown()
    }
}
