//! Validation for onboarding and profile edits.

use chrono::{Datelike, NaiveDate};

use crate::constants::{MAX_BIO_LEN, MIN_AGE_YEARS, USERNAME_MAX_LEN, USERNAME_MIN_LEN};
use crate::error::ProfileError;

/// Validate a requested username and return its stored (lowercased) form.
pub fn normalize_username(raw: &str) -> Result<String, ProfileError> {
    let name = raw.trim();

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ProfileError::UsernameCharset);
    }

    let len = name.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(ProfileError::UsernameLength {
            min: USERNAME_MIN_LEN,
            max: USERNAME_MAX_LEN,
        });
    }

    Ok(name.to_ascii_lowercase())
}

pub fn validate_bio(bio: &str) -> Result<(), ProfileError> {
    if bio.chars().count() > MAX_BIO_LEN {
        return Err(ProfileError::BioTooLong { max: MAX_BIO_LEN });
    }
    Ok(())
}

/// Whole years between `birthday` and `today`.
pub fn age_on(birthday: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        age -= 1;
    }
    age
}

/// Check the birthday is plausible and old enough; returns the age.
pub fn validate_birthday(birthday: NaiveDate, today: NaiveDate) -> Result<i32, ProfileError> {
    if birthday > today {
        return Err(ProfileError::BirthdayInFuture);
    }
    let age = age_on(birthday, today);
    if age < MIN_AGE_YEARS {
        return Err(ProfileError::Underage { min: MIN_AGE_YEARS });
    }
    Ok(age)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_username_is_lowercased() {
        assert_eq!(normalize_username("  Alice_01 ").unwrap(), "alice_01");
    }

    #[test]
    fn test_username_bounds() {
        assert!(matches!(
            normalize_username("ab"),
            Err(ProfileError::UsernameLength { .. })
        ));
        assert!(normalize_username("abc").is_ok());
        assert!(normalize_username("abcdefghij").is_ok());
        assert!(normalize_username("abcdefghijk").is_err());
    }

    #[test]
    fn test_username_charset() {
        assert_eq!(
            normalize_username("bad name"),
            Err(ProfileError::UsernameCharset)
        );
        assert_eq!(normalize_username("héllo"), Err(ProfileError::UsernameCharset));
        assert_eq!(normalize_username("a-b-c"), Err(ProfileError::UsernameCharset));
    }

    #[test]
    fn test_age_counts_birthday_not_yet_reached() {
        assert_eq!(age_on(date(2000, 6, 15), date(2018, 6, 14)), 17);
        assert_eq!(age_on(date(2000, 6, 15), date(2018, 6, 15)), 18);
    }

    #[test]
    fn test_validate_birthday() {
        let today = date(2026, 10, 14);
        assert_eq!(validate_birthday(date(1990, 1, 1), today).unwrap(), 36);
        assert_eq!(
            validate_birthday(date(2010, 1, 1), today),
            Err(ProfileError::Underage { min: 18 })
        );
        assert_eq!(
            validate_birthday(date(2030, 1, 1), today),
            Err(ProfileError::BirthdayInFuture)
        );
    }

    #[test]
    fn test_bio_limit() {
        assert!(validate_bio(&"x".repeat(500)).is_ok());
        assert!(validate_bio(&"x".repeat(501)).is_err());
    }
}
