use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{SantaError, SantaResult};
use crate::records::{Employee, EMPLOYEE_EMAIL, EMPLOYEE_NAME, SECRET_CHILD_EMAIL, SECRET_CHILD_NAME};
use crate::santa::{Assignment, ForbiddenIndex};

pub const OUTPUT_HEADERS: [&str; 4] = [
    EMPLOYEE_NAME,
    EMPLOYEE_EMAIL,
    SECRET_CHILD_NAME,
    SECRET_CHILD_EMAIL,
];

/// Renders the draw as CSV, one line per giver in roster order.
///
/// Fields holding a quote, comma or line break are quoted, with inner quotes
/// doubled. Lines end in `\n`; the last one has no terminator.
pub fn format_assignments_csv(employees: &[Employee], assignment: &Assignment) -> SantaResult<String> {
    if assignment.len() != employees.len() {
        return Err(SantaError::AssignmentSizeMismatch {
            employees: employees.len(),
            assignment: assignment.len(),
        });
    }

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(OUTPUT_HEADERS)?;
    for (giver, recipient) in assignment.pairs() {
        let (giver, child) = (&employees[giver], &employees[recipient]);
        wtr.write_record([&giver.name, &giver.email, &child.name, &child.email])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| SantaError::Io(e.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| SantaError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Writes the rendered CSV to `path`, replacing any existing file.
pub fn write_assignments_to_file<P: AsRef<Path>>(csv: &str, path: P) -> SantaResult<()> {
    let mut file = File::create(path)?;
    file.write_all(csv.as_bytes())?;
    Ok(())
}

/// Console summary printed after a command-line run. Never shows who drew whom.
pub fn print_summary(employees: &[Employee], forbidden: &ForbiddenIndex, output: &Path) {
    println!("\n=== Secret Santa ===");
    println!("Participants: {}", employees.len());
    if forbidden.constrained_count() > 0 {
        println!(
            "Repeat pairings excluded from last round: {}",
            forbidden.constrained_count()
        );
    }
    println!("Assignments saved to: {}", output.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(name: &str, email: &str) -> Employee {
        Employee {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn swap() -> Assignment {
        Assignment::new(vec![1, 0], &ForbiddenIndex::unconstrained(2)).unwrap()
    }

    #[test]
    fn commas_and_quotes_are_escaped() {
        let employees = vec![
            employee("Alice,Doe", "alice@x.com"),
            employee("Bob \"B\"", "bob@x.com"),
        ];
        let csv = format_assignments_csv(&employees, &swap()).unwrap();

        assert_eq!(
            csv,
            "Employee_Name,Employee_EmailID,Secret_Child_Name,Secret_Child_EmailID\n\
             \"Alice,Doe\",alice@x.com,\"Bob \"\"B\"\"\",bob@x.com\n\
             \"Bob \"\"B\"\"\",bob@x.com,\"Alice,Doe\",alice@x.com"
        );
    }

    #[test]
    fn line_breaks_inside_fields_are_quoted() {
        let employees = vec![employee("Multi\nLine", "m@x.com"), employee("Plain", "p@x.com")];
        let csv = format_assignments_csv(&employees, &swap()).unwrap();

        assert!(csv.contains("\"Multi\nLine\",m@x.com,Plain,p@x.com"));
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn assignment_of_other_size_is_rejected() {
        let two = vec![employee("A", "a@x.com"), employee("B", "b@x.com")];
        let three = vec![
            employee("A", "a@x.com"),
            employee("B", "b@x.com"),
            employee("C", "c@x.com"),
        ];
        let cycle = Assignment::new(vec![1, 2, 0], &ForbiddenIndex::unconstrained(3)).unwrap();

        let err = format_assignments_csv(&two, &cycle).unwrap_err();
        assert!(matches!(
            err,
            SantaError::AssignmentSizeMismatch {
                employees: 2,
                assignment: 3
            }
        ));

        let err = format_assignments_csv(&three, &swap()).unwrap_err();
        assert_eq!(err.kind(), "AssignmentSizeMismatch");
    }

    #[test]
    fn written_file_matches_rendered_text() {
        let employees = vec![employee("A", "a@x.com"), employee("B", "b@x.com")];
        let csv = format_assignments_csv(&employees, &swap()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_assignments_to_file(&csv, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), csv);
    }
}
