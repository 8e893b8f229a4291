//! Record display formatting

use crate::services::RecordView;

/// Format one record as `id, field=value, ...`
pub fn format_record_line(view: &RecordView) -> String {
    let mut line = view.record_id.to_string();
    for (field, value) in &view.values {
        line.push_str(&format!(", {}={}", field, value));
    }
    line
}

/// Format records one per line
pub fn format_record_list(views: &[RecordView]) -> String {
    views
        .iter()
        .map(format_record_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordField, RecordId};

    fn view(id: &str, values: &[(RecordField, &str)]) -> RecordView {
        RecordView {
            record_id: RecordId::new(id).unwrap(),
            values: values.iter().map(|(f, v)| (*f, v.to_string())).collect(),
        }
    }

    #[test]
    fn test_record_line() {
        let v = view(
            "rec1",
            &[(RecordField::Surname, "Doe"), (RecordField::GivenName, "")],
        );
        assert_eq!(format_record_line(&v), "rec1, sn=Doe, gn=");
    }

    #[test]
    fn test_record_list() {
        let views = [
            view("a", &[(RecordField::City, "Oslo")]),
            view("b", &[(RecordField::City, "Rome")]),
        ];
        assert_eq!(format_record_list(&views), "a, city=Oslo\nb, city=Rome");
    }
}
