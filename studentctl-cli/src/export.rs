use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use studentctl_core::Student;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// One JSON object per line
    Ndjson,
    /// Comma-separated values with a header row
    Csv,
}

const CSV_HEADER: &str = "ID,Name,Age,Course";

/// Quote a text field, doubling any embedded quotes
fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Write every student in the requested format
pub fn write_students<W: Write>(students: &[Student], format: ExportFormat, mut out: W) -> Result<()> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, students)
                .context("Failed to serialize students")?;
            writeln!(out)?;
        }
        ExportFormat::Ndjson => {
            for student in students {
                serde_json::to_writer(&mut out, student)
                    .with_context(|| format!("Failed to serialize student {}", student.id))?;
                writeln!(out)?;
            }
        }
        ExportFormat::Csv => {
            writeln!(out, "{CSV_HEADER}")?;
            for student in students {
                writeln!(
                    out,
                    "{},{},{},{}",
                    student.id,
                    csv_quote(&student.name),
                    student.age,
                    csv_quote(&student.course)
                )
                .with_context(|| format!("Failed to write student {}", student.id))?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn students() -> Vec<Student> {
        vec![
            Student::new(1, "Alice", 20, "CS"),
            Student::new(2, "Bob", 19, "History"),
        ]
    }

    #[test]
    fn json_is_an_array() {
        let mut buf = Vec::new();
        write_students(&students(), ExportFormat::Json, &mut buf).unwrap();

        let parsed: Vec<Student> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, students());
    }

    #[test]
    fn ndjson_is_one_object_per_line() {
        let mut buf = Vec::new();
        write_students(&students(), ExportFormat::Ndjson, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"id":1,"name":"Alice","age":20,"course":"CS"}"#
        );
    }

    #[test]
    fn csv_has_header_and_quoted_text() {
        let mut rows = students();
        rows.push(Student::new(3, "Carol \"CJ\" Jones", 22, "Art, History"));

        let mut buf = Vec::new();
        write_students(&rows, ExportFormat::Csv, &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "ID,Name,Age,Course\n\
             1,\"Alice\",20,\"CS\"\n\
             2,\"Bob\",19,\"History\"\n\
             3,\"Carol \"\"CJ\"\" Jones\",22,\"Art, History\"\n"
        );
    }

    #[test]
    fn empty_exports() {
        let mut buf = Vec::new();
        write_students(&[], ExportFormat::Json, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[]\n");

        let mut buf = Vec::new();
        write_students(&[], ExportFormat::Ndjson, &mut buf).unwrap();
        assert!(buf.is_empty());

        let mut buf = Vec::new();
        write_students(&[], ExportFormat::Csv, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "ID,Name,Age,Course\n");
    }
}
