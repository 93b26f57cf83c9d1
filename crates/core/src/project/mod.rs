//! Projects: repository port and intake validation

pub mod ports;

pub use ports::ProjectRepository;

use sunquote_domain::types::Project;
use sunquote_domain::{Result, SunquoteError};

/// Validate client/site intake fields before a project is saved.
///
/// Mirrors the intake form rules: client name and site address are
/// required, and a contact email must at least look like one.
pub fn validate_intake(project: &Project) -> Result<()> {
    if project.client_name.trim().is_empty() {
        return Err(SunquoteError::Validation("client name is required".into()));
    }
    if project.site_address.trim().is_empty() {
        return Err(SunquoteError::Validation("site address is required".into()));
    }
    if let Some(email) = &project.contact_email {
        let shape_ok = email.contains('@')
            && !email.starts_with('@')
            && !email.ends_with('@')
            && !email.contains(char::is_whitespace);
        if !shape_ok {
            return Err(SunquoteError::Validation(format!(
                "contact email '{email}' is not a valid address"
            )));
        }
    }
    Ok(())
}
