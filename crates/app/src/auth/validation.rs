//! Profile field validation.

use thiserror::Error;

use crate::domain::users::records::PostalAddress;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,

    #[error("email address is invalid")]
    InvalidEmail,

    #[error("password must be at least {MIN_PASSWORD_CHARS} characters")]
    PasswordTooShort,

    #[error("address {0} is required")]
    IncompleteAddress(&'static str),
}

/// Trimmed, non-empty display name.
pub(crate) fn name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    Ok(name.to_string())
}

/// Lower-cased email with a non-empty local part and a dotted domain.
pub(crate) fn email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();

    let (local, domain) = email.split_once('@').ok_or(ValidationError::InvalidEmail)?;

    let domain_ok = !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));

    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(email)
}

pub(crate) fn password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Address with every field trimmed and present.
///
/// # Errors
///
/// Returns [`ValidationError::IncompleteAddress`] naming the first blank field.
pub fn address(address: PostalAddress) -> Result<PostalAddress, ValidationError> {
    let field = |value: String, label: &'static str| {
        let value = value.trim();

        if value.is_empty() {
            return Err(ValidationError::IncompleteAddress(label));
        }

        Ok(value.to_string())
    };

    Ok(PostalAddress {
        street: field(address.street, "street")?,
        city: field(address.city, "city")?,
        state: field(address.state, "state")?,
        postal_code: field(address.postal_code, "postal code")?,
        country: field(address.country, "country")?,
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn name_is_trimmed() -> TestResult {
        assert_eq!(name("  Ada  ")?, "Ada");
        assert_eq!(name("   "), Err(ValidationError::EmptyName));

        Ok(())
    }

    #[test]
    fn email_is_lower_cased() -> TestResult {
        assert_eq!(email(" Ada@Example.COM ")?, "ada@example.com");

        Ok(())
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for candidate in ["", "ada", "@example.com", "ada@", "ada@example", "ada@.com", "a b@x.io"] {
            assert_eq!(
                email(candidate),
                Err(ValidationError::InvalidEmail),
                "{candidate:?} should be rejected"
            );
        }
    }

    #[test]
    fn password_needs_six_characters() {
        assert_eq!(password("12345"), Err(ValidationError::PasswordTooShort));
        assert_eq!(password("123456"), Ok(()));
    }

    fn postal_address() -> PostalAddress {
        PostalAddress {
            street: " 1 Analytical Way ".to_string(),
            city: "London".to_string(),
            state: "London".to_string(),
            postal_code: "N1 1AA".to_string(),
            country: "UK".to_string(),
        }
    }

    #[test]
    fn address_fields_are_trimmed() -> TestResult {
        assert_eq!(address(postal_address())?.street, "1 Analytical Way");

        Ok(())
    }

    #[test]
    fn address_rejects_blank_fields() {
        let blank_city = PostalAddress {
            city: "  ".to_string(),
            ..postal_address()
        };

        let blank_country = PostalAddress {
            country: String::new(),
            ..postal_address()
        };

        assert_eq!(address(blank_city), Err(ValidationError::IncompleteAddress("city")));
        assert_eq!(
            address(blank_country),
            Err(ValidationError::IncompleteAddress("country"))
        );
    }
}
