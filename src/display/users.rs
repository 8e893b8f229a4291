//! User list display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::services::UserSummary;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Password")]
    password: &'static str,
}

/// Format the user list as a table
pub fn format_user_list(users: &[UserSummary]) -> String {
    let rows = users.iter().map(|u| UserRow {
        user: u.id.to_string(),
        password: if u.has_password { "set" } else { "not set" },
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    #[test]
    fn test_user_table() {
        let users = vec![
            UserSummary {
                id: UserId::admin(),
                has_password: true,
            },
            UserSummary {
                id: UserId::new("Alice").unwrap(),
                has_password: false,
            },
        ];

        let output = format_user_list(&users);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("User") && lines[0].contains("Password"));
        assert!(lines[2].contains("admin") && lines[2].contains("set"));
        assert!(lines[3].contains("Alice") && lines[3].contains("not set"));
    }
}
