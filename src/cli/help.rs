//! Help text for the interactive prompt

use crate::models::RecordField;
use crate::services::OperationClass;

use super::command::CommandKind;

impl CommandKind {
    /// Argument synopsis shown in help
    pub fn usage(&self) -> &'static str {
        match self {
            Self::Login | Self::AddUser | Self::DeleteUser => "<userID>",
            Self::ReadAudit => "[<userID>]",
            Self::AddRecord => "<record_id> [<field1=value1> <field2=value2> ...]",
            Self::DeleteRecord => "<record_id>",
            Self::EditRecord => "<record_id> <field1=value1> [<field2=value2> ...]",
            Self::ReadRecord => "<record_id> [<fieldname> ...]",
            Self::ReadAllRecords => "[<fieldname> ...]",
            Self::Import => "<Input_File>",
            Self::Export => "<Output_file>",
            _ => "",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Login => "Log in",
            Self::Logout => "Log out",
            Self::ChangePassword => "Change password",
            Self::AddUser => "Add user",
            Self::DeleteUser => "Delete user and all of their records",
            Self::ListUsers => "List users",
            Self::ReadAudit => "Read audit log",
            Self::ClearAudit => "Delete audit log",
            Self::AddRecord => "Add record",
            Self::DeleteRecord => "Delete record",
            Self::EditRecord => "Edit record",
            Self::ReadRecord => "Read record",
            Self::ReadAllRecords => "Read all records",
            Self::Import => "Import records from CSV",
            Self::Export => "Export records to CSV",
            Self::WhoAmI => "Who am I",
            Self::Help => "Help",
            Self::Exit => "Exit",
        }
    }
}

fn command_line(kind: CommandKind) -> String {
    format!(
        "    {:<17} {} ({}) {}",
        format!("{}:", kind.summary()),
        kind.long_name(),
        kind.code(),
        kind.usage()
    )
    .trim_end()
    .to_string()
}

/// Full help text
pub fn help_text() -> String {
    let mut text = format!("aba {}\n\nValid commands:\n", env!("CARGO_PKG_VERSION"));

    for kind in CommandKind::ALL
        .into_iter()
        .filter(|k| k.operation_class() != OperationClass::AdminOnly)
    {
        text.push_str(&command_line(kind));
        text.push('\n');
    }

    text.push_str("\nAdmin-only commands:\n");
    for kind in CommandKind::ALL
        .into_iter()
        .filter(|k| k.operation_class() == OperationClass::AdminOnly)
    {
        text.push_str(&command_line(kind));
        text.push('\n');
    }

    text.push_str("\nRecord fields:\n");
    for field in RecordField::ALL {
        text.push_str(&format!("    {:<5} {}\n", field.name(), field.description()));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_command() {
        let text = help_text();
        for kind in CommandKind::ALL {
            assert!(text.contains(kind.code()), "{}", kind.code());
            assert!(text.contains(kind.long_name()), "{}", kind.long_name());
        }
    }

    #[test]
    fn test_admin_commands_listed_separately() {
        let text = help_text();
        let (user_part, admin_part) = text.split_once("Admin-only commands:").unwrap();
        assert!(admin_part.contains("add-user (ADU) <userID>"));
        assert!(!user_part.contains("ADU"));
        assert!(user_part.contains("add-record (ADR)"));
    }

    #[test]
    fn test_help_lists_fields() {
        let text = help_text();
        assert!(text.contains("sn    Surname"));
        assert!(text.contains("pc    Postal code"));
    }
}
