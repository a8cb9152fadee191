//! Input validation for contract rendering.
//!
//! Collects every problem at once so the caller can fix the record in a single
//! round trip instead of one field per attempt.

use std::fmt;

use chrono::NaiveDate;

use crate::contract::model::{Contract, ContractEditor, Guardian, Payment, Student};

use super::traits::Validator;

/// Validation error with a readable message.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation, e.g. `student.birthDate`
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for a missing contract section
    pub fn missing_section(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} section is missing", label))
            .with_suggestion(format!("Complete the {} details before printing", label))
    }

    /// Create error for a missing required date
    pub fn missing_date(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} is required", label))
            .with_suggestion("Use the format YYYY-MM-DD, e.g. 2012-09-01")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// One line per problem, numbered.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "{} required field(s) missing:",
            self.errors.len()
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }
        parts.join("\n")
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate that an optional value is present
pub fn validate_present<'a, T>(
    value: Option<&'a T>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a T> {
    if value.is_none() {
        errors.add(ValidationError::missing_section(field, label));
    }
    value
}

/// Validate that a required date is present
pub fn validate_date<T>(
    value: Option<T>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    if value.is_none() {
        errors.add(ValidationError::missing_date(field, label));
    }
    value
}

/// A contract whose required sections and dates are known to be present.
#[derive(Debug, Clone, Copy)]
pub struct CheckedContract<'a> {
    pub guardian: &'a Guardian,
    pub editor: &'a ContractEditor,
    pub student: &'a Student,
    pub payment: &'a Payment,
    pub birth_date: NaiveDate,
    pub id_issue_date: NaiveDate,
}

impl Contract {
    /// Sections and dates without which the contract cannot be printed.
    /// Optional text fields are not checked; they print as a blank line.
    pub fn checked(&self) -> Result<CheckedContract<'_>, String> {
        let mut errors = ValidationErrors::new();

        let guardian =
            validate_present(self.guardian.as_ref(), "guardian", "Guardian", &mut errors);
        let editor = validate_present(
            self.contract_editor.as_ref(),
            "contractEditor",
            "Contract editor",
            &mut errors,
        );
        let payment = validate_present(self.payment.as_ref(), "payment", "Payment", &mut errors);
        let student = validate_present(self.student.as_ref(), "student", "Student", &mut errors);

        let (birth_date, id_issue_date) = match student {
            Some(student) => (
                validate_date(
                    student.birth_date,
                    "student.birthDate",
                    "Student birth date",
                    &mut errors,
                ),
                validate_date(
                    student.id_issue_date,
                    "student.idIssueDate",
                    "Student ID issue date",
                    &mut errors,
                ),
            ),
            None => (None, None),
        };

        match (guardian, editor, student, payment, birth_date, id_issue_date) {
            (
                Some(guardian),
                Some(editor),
                Some(student),
                Some(payment),
                Some(birth_date),
                Some(id_issue_date),
            ) => Ok(CheckedContract {
                guardian,
                editor,
                student,
                payment,
                birth_date,
                id_issue_date,
            }),
            _ => Err(errors.to_message()),
        }
    }
}

impl Validator for Contract {
    fn validate(&self) -> Result<(), String> {
        self.checked().map(|_| ())
    }
}
