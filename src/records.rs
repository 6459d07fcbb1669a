use std::collections::HashSet;

use crate::error::{SantaError, SantaResult};
use crate::parser::ParsedTable;

pub const EMPLOYEE_NAME: &str = "Employee_Name";
pub const EMPLOYEE_EMAIL: &str = "Employee_EmailID";
pub const SECRET_CHILD_NAME: &str = "Secret_Child_Name";
pub const SECRET_CHILD_EMAIL: &str = "Secret_Child_EmailID";

pub const EMPLOYEE_HEADERS: &[&str] = &[EMPLOYEE_NAME, EMPLOYEE_EMAIL];
pub const PREVIOUS_HEADERS: &[&str] = &[
    EMPLOYEE_NAME,
    EMPLOYEE_EMAIL,
    SECRET_CHILD_NAME,
    SECRET_CHILD_EMAIL,
];

pub const MIN_PARTICIPANTS: usize = 2;

/// A participant in the draw. The email is the identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub name: String,
    pub email: String,
}

/// One giver → child pairing from last round's output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousAssignment {
    pub giver_name: String,
    pub giver_email: String,
    pub child_name: String,
    pub child_email: String,
}

/// Builds the participant list, in file order.
///
/// Emails are compared case-sensitively after trimming.
pub fn parse_employees(table: &ParsedTable) -> SantaResult<Vec<Employee>> {
    let employees: Vec<Employee> = (0..table.rows.len())
        .map(|index| Employee {
            name: table.cell(index, EMPLOYEE_NAME).trim().to_string(),
            email: table.cell(index, EMPLOYEE_EMAIL).trim().to_string(),
        })
        .collect();

    if employees.len() < MIN_PARTICIPANTS {
        return Err(SantaError::TooFewParticipants {
            found: employees.len(),
        });
    }

    let mut seen = HashSet::new();
    for employee in &employees {
        if !seen.insert(employee.email.as_str()) {
            return Err(SantaError::DuplicateEmail);
        }
    }

    Ok(employees)
}

/// Reads last round's pairings.
///
/// Rows without both a giver and a child email carry no constraint and are
/// skipped. A giver listed twice is an error even if that giver has since
/// left the roster.
pub fn parse_previous_assignments(table: &ParsedTable) -> SantaResult<Vec<PreviousAssignment>> {
    let mut assignments = Vec::with_capacity(table.rows.len());
    let mut seen_givers = HashSet::new();

    for index in 0..table.rows.len() {
        let giver_email = table.cell(index, EMPLOYEE_EMAIL).trim();
        let child_email = table.cell(index, SECRET_CHILD_EMAIL).trim();
        if giver_email.is_empty() || child_email.is_empty() {
            continue;
        }

        if !seen_givers.insert(giver_email.to_string()) {
            return Err(SantaError::DuplicatePreviousGiver);
        }

        assignments.push(PreviousAssignment {
            giver_name: table.cell(index, EMPLOYEE_NAME).trim().to_string(),
            giver_email: giver_email.to_string(),
            child_name: table.cell(index, SECRET_CHILD_NAME).trim().to_string(),
            child_email: child_email.to_string(),
        });
    }

    Ok(assignments)
}
