use crate::error::FieldError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Fixed role catalogue: each known role belongs to exactly one department.
/// Free-form departments/roles outside this table are accepted; a known role
/// paired with the wrong department is not.
pub static ROLE_TO_DEPARTMENT: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Recruiter", "HR"),
        ("Payroll Executive", "HR"),
        ("IT Manager", "IT"),
        ("Frontend Developer", "IT"),
        ("Backend Developer", "IT"),
        ("DevOps Engineer", "IT"),
        ("QA Tester", "IT"),
        ("Operations Manager", "Operations"),
        ("Logistics Coordinator", "Operations"),
        ("Warehouse Supervisor", "Operations"),
        ("Marketing Head", "Marketing"),
        ("SEO Analyst", "Marketing"),
        ("Content Writer", "Marketing"),
        ("Graphic Designer", "Marketing"),
        ("Sales Manager", "Sales"),
        ("Sales Executive", "Sales"),
    ])
});

/// Pure employee-form validation: returns every field-level failure instead
/// of stopping at the first one. Does not touch the store; uniqueness is
/// checked separately against it.
pub fn validate_employee(
    employee_id: &str,
    full_name: &str,
    email: &str,
    department: &str,
    role: &str,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if employee_id.trim().is_empty() {
        errors.push(FieldError::new("employeeId", "Employee ID is required"));
    } else if employee_id.contains(char::is_whitespace) {
        errors.push(FieldError::new(
            "employeeId",
            "Employee ID cannot contain spaces",
        ));
    } else if !employee_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(FieldError::new(
            "employeeId",
            "Employee ID can only contain letters and numbers",
        ));
    }

    if full_name.trim().is_empty() {
        errors.push(FieldError::new("fullName", "Full name is required"));
    }

    if email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(email.trim()) {
        errors.push(FieldError::new("email", "Invalid email format"));
    }

    if department.trim().is_empty() {
        errors.push(FieldError::new("department", "Department is required"));
    }

    if role.trim().is_empty() {
        errors.push(FieldError::new("role", "Role is required"));
    }

    if let Some(err) = check_role_department(department.trim(), role.trim()) {
        errors.push(err);
    }

    errors
}

/// `\S+@\S+\.\S+` with exactly one `@`: non-empty local part, domain with a
/// dot that is neither its first nor last character.
fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.find('.') {
        Some(idx) => idx > 0 && idx < domain.len() - 1 && !domain.ends_with('.'),
        None => false,
    }
}

fn check_role_department(department: &str, role: &str) -> Option<FieldError> {
    if department.is_empty() || role.is_empty() {
        return None;
    }
    let matched = ROLE_TO_DEPARTMENT
        .iter()
        .find(|(known_role, _)| known_role.eq_ignore_ascii_case(role));
    let (known_role, correct_dept) = matched?;
    if correct_dept.eq_ignore_ascii_case(department) {
        None
    } else {
        Some(FieldError::new(
            "role",
            format!(
                "Wrong department - {} belongs to {} department",
                known_role, correct_dept
            ),
        ))
    }
}
