//! Field-level validation applied before every insert and update.

use validator::{Validate, ValidationErrors};

pub const NAME_MAX_LEN: u64 = 120;
pub const EMAIL_MAX_LEN: u64 = 160;
pub const ROLE_MAX_LEN: u64 = 40;

/// The editable columns of a user row, as they will be written.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct UserFields {
    #[validate(length(min = 1, max = 120, message = "name must be 1 to 120 characters"))]
    pub name: String,
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 160, message = "email must be at most 160 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 40, message = "role must be 1 to 40 characters"))]
    pub role: String,
}

impl UserFields {
    /// Runs all field validators and joins their messages into one line.
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(join_messages)
    }
}

/// Flattens validator errors into a single `"; "`-separated message, sorted
/// so the output does not depend on hash order.
pub fn join_messages(errors: ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, email: &str, role: &str) -> UserFields {
        UserFields {
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_fields() {
        assert!(fields("Ada Lovelace", "ada@example.com", "user").check().is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        let err = fields("Ada", "not-an-email", "user")
            .check()
            .expect_err("malformed email should fail");
        assert!(err.contains("email"));
    }

    #[test]
    fn enforces_length_limits() {
        let long_name = "n".repeat(NAME_MAX_LEN as usize + 1);
        assert!(fields(&long_name, "ada@example.com", "user").check().is_err());
        let max_name = "n".repeat(NAME_MAX_LEN as usize);
        assert!(fields(&max_name, "ada@example.com", "user").check().is_ok());

        let long_role = "r".repeat(ROLE_MAX_LEN as usize + 1);
        assert!(fields("Ada", "ada@example.com", &long_role).check().is_err());

        // syntactically valid, but 174 characters long
        let long_email = format!(
            "{}@{}.{}.example.com",
            "e".repeat(60),
            "a".repeat(50),
            "b".repeat(50)
        );
        assert!(long_email.len() as u64 > EMAIL_MAX_LEN);
        let err = fields("Ada", &long_email, "user")
            .check()
            .expect_err("overlong email should fail");
        assert!(err.contains("160"));
    }

    #[test]
    fn reports_every_failing_field() {
        let err = fields("", "nope", "")
            .check()
            .expect_err("all fields invalid");
        assert!(err.contains("name"));
        assert!(err.contains("email"));
        assert!(err.contains("role"));
    }
}
