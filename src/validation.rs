//! Input validation for the agency, sub-account, user, invitation and media
//! forms. Every text field needs at least two characters, counted as typed
//! (surrounding whitespace included); email fields must look like addresses.
//! Ids only have to be present.

use std::sync::OnceLock;

use regex::Regex;

use crate::db::{DbAgency, DbSubAccount, DbUser};
use crate::error::ServiceError;

const MIN_TEXT_LEN: usize = 2;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn require_text(field: &'static str, value: &str) -> Result<(), ServiceError> {
    if value.chars().count() < MIN_TEXT_LEN {
        return Err(ServiceError::Validation {
            field,
            reason: format!("must be at least {MIN_TEXT_LEN} characters"),
        });
    }
    Ok(())
}

pub fn require_email(field: &'static str, value: &str) -> Result<(), ServiceError> {
    require_text(field, value)?;
    if !email_regex().is_match(value) {
        return Err(ServiceError::Validation {
            field,
            reason: format!("'{value}' is not an email address"),
        });
    }
    Ok(())
}

pub fn require_id(field: &'static str, value: &str) -> Result<(), ServiceError> {
    if value.is_empty() {
        return Err(ServiceError::Validation {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

pub fn validate_agency(agency: &DbAgency) -> Result<(), ServiceError> {
    require_id("id", &agency.id)?;
    require_text("name", &agency.name)?;
    require_text("agencyLogo", &agency.agency_logo)?;
    require_email("companyEmail", &agency.company_email)?;
    require_text("companyPhone", &agency.company_phone)?;
    require_text("address", &agency.address)?;
    require_text("city", &agency.city)?;
    require_text("zipCode", &agency.zip_code)?;
    require_text("state", &agency.state)?;
    require_text("country", &agency.country)
}

pub fn validate_sub_account(sub: &DbSubAccount) -> Result<(), ServiceError> {
    require_id("id", &sub.id)?;
    require_id("agencyId", &sub.agency_id)?;
    require_text("name", &sub.name)?;
    require_text("subAccountLogo", &sub.sub_account_logo)?;
    require_email("companyEmail", &sub.company_email)?;
    require_text("companyPhone", &sub.company_phone)?;
    require_text("address", &sub.address)?;
    require_text("city", &sub.city)?;
    require_text("zipCode", &sub.zip_code)?;
    require_text("state", &sub.state)?;
    require_text("country", &sub.country)
}

pub fn validate_user(user: &DbUser) -> Result<(), ServiceError> {
    require_text("name", &user.name)?;
    require_text("avatarUrl", &user.avatar_url)?;
    require_email("email", &user.email)
}

pub fn validate_media(name: &str, link: &str) -> Result<(), ServiceError> {
    require_text("name", name)?;
    require_text("link", link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{sample_agency, sample_sub_account};

    fn field_of(err: ServiceError) -> &'static str {
        match err {
            ServiceError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_short_text_rejected() {
        assert!(require_text("name", "ab").is_ok());
        assert_eq!(field_of(require_text("name", "a").unwrap_err()), "name");
        assert_eq!(field_of(require_text("name", "").unwrap_err()), "name");
    }

    #[test]
    fn test_length_counts_whitespace_as_typed() {
        assert!(require_text("name", " a").is_ok());
        assert!(require_text("name", "  ").is_ok());
        assert!(require_text("name", " ").is_err());
    }

    #[test]
    fn test_ids_only_need_to_be_present() {
        let mut agency = sample_agency("a");
        assert!(validate_agency(&agency).is_ok());
        agency.id = String::new();
        assert_eq!(field_of(validate_agency(&agency).unwrap_err()), "id");

        let mut sub = sample_sub_account("s", "a");
        assert!(validate_sub_account(&sub).is_ok());
        sub.agency_id = String::new();
        assert_eq!(field_of(validate_sub_account(&sub).unwrap_err()), "agencyId");
    }

    #[test]
    fn test_email_shape() {
        assert!(require_email("email", "a@b.com").is_ok());
        assert!(require_email("email", "not-an-email").is_err());
        assert!(require_email("email", "a@b").is_err());
        assert!(require_email("email", "a b@c.com").is_err());
    }

    #[test]
    fn test_agency_form() {
        let mut agency = sample_agency("ag1");
        assert!(validate_agency(&agency).is_ok());
        agency.city = "X".into();
        assert_eq!(field_of(validate_agency(&agency).unwrap_err()), "city");
    }

    #[test]
    fn test_sub_account_form() {
        let mut sub = sample_sub_account("sa1", "ag1");
        assert!(validate_sub_account(&sub).is_ok());
        sub.company_email = "nope".into();
        assert_eq!(field_of(validate_sub_account(&sub).unwrap_err()), "companyEmail");
    }
}
