//! Respondent identity validation

use super::validation::bounded;
use super::ValidationError;

/// Column limit shared by name, email, and company name
const MAX_IDENTITY_LEN: usize = 255;

/// Email address, the respondent lookup key.
///
/// Only presence and length are checked; the address is not parsed.
/// Compared verbatim (after trimming): `A@x.com` and `a@x.com` are
/// different respondents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// # Example
    /// ```
    /// use formctl_server::models::Email;
    ///
    /// assert!(Email::new("a@x.com").is_ok());
    /// assert!(Email::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded("email", s, MAX_IDENTITY_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Who filled out the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRespondent {
    pub name: String,
    pub email: Email,
    pub company_name: Option<String>,
}

impl NewRespondent {
    /// Validate respondent fields from a submission.
    ///
    /// A blank company name is treated as absent.
    pub fn new(
        name: &str,
        email: &str,
        company_name: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let name = bounded("name", name, MAX_IDENTITY_LEN)?;
        let email = Email::new(email)?;
        let company_name = match company_name.map(str::trim) {
            Some(c) if !c.is_empty() => Some(bounded("companyName", c, MAX_IDENTITY_LEN)?),
            _ => None,
        };

        Ok(Self {
            name,
            email,
            company_name,
        })
    }
}
