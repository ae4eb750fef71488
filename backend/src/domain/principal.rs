//! Principal identity types.
//!
//! A principal is the household account a bearer token speaks for. Every
//! field is validated on construction so the rest of the crate can rely on
//! the invariants documented on each type.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ValidationErrors;

/// Icon shown for principals who did not pick one.
pub const DEFAULT_DISPLAY_ICON: &str = "👤";

const MAX_TEXT_LEN: usize = 64;
const MAX_ICON_LEN: usize = 16;
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        // Digit count is enforced separately.
        Regex::new(r"^\+?[0-9 ]+$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Validation errors raised by principal field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalValidationError {
    #[error("principal id must be a valid UUID")]
    InvalidId,
    #[error("Please add a name")]
    EmptyName,
    #[error("Name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("Please add a valid email")]
    InvalidEmail,
    #[error("Please add a valid phone number")]
    InvalidPhone,
    #[error("Please add a city")]
    EmptyCity,
    #[error("City must be at most {max} characters")]
    CityTooLong { max: usize },
    #[error("Display icon must be at most {max} characters")]
    IconTooLong { max: usize },
}

/// Stable principal identifier.
///
/// # Examples
/// ```
/// use ecowaste::domain::PrincipalId;
///
/// let id = PrincipalId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// assert!(PrincipalId::new("nope").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Parse an identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PrincipalValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| PrincipalValidationError::InvalidId)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn bounded_text(
    raw: &str,
    empty: PrincipalValidationError,
    too_long: PrincipalValidationError,
) -> Result<String, PrincipalValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Person or household name, trimmed, 1 to 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PrincipalValidationError> {
        bounded_text(
            raw.as_ref(),
            PrincipalValidationError::EmptyName,
            PrincipalValidationError::NameTooLong { max: MAX_TEXT_LEN },
        )
        .map(Self)
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Lower-cased email address of the form `local@domain.tld`.
///
/// # Examples
/// ```
/// use ecowaste::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Priya.Sharma@Example.com ").unwrap();
/// assert_eq!(email.as_ref(), "priya.sharma@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PrincipalValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalized) {
            return Err(PrincipalValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Phone number as entered, with a digits-only key for comparisons.
///
/// `+91 98765 43210` and `+919876543210` are the same number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber {
    display: String,
    digits: String,
}

impl PhoneNumber {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PrincipalValidationError> {
        let display = raw.as_ref().trim();
        if !phone_regex().is_match(display) {
            return Err(PrincipalValidationError::InvalidPhone);
        }
        let digits: String = display.chars().filter(char::is_ascii_digit).collect();
        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
            return Err(PrincipalValidationError::InvalidPhone);
        }
        Ok(Self {
            display: display.to_owned(),
            digits,
        })
    }

    /// Digits only; the identity used for uniqueness and login lookups.
    pub fn digits(&self) -> &str {
        self.digits.as_str()
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for PhoneNumber {}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.display.as_str()
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PrincipalValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.display
    }
}

/// City name, trimmed, 1 to 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct City(String);

impl City {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PrincipalValidationError> {
        bounded_text(
            raw.as_ref(),
            PrincipalValidationError::EmptyCity,
            PrincipalValidationError::CityTooLong { max: MAX_TEXT_LEN },
        )
        .map(Self)
    }
}

impl AsRef<str> for City {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

fn display_icon(raw: Option<&str>) -> Result<String, PrincipalValidationError> {
    match raw.map(str::trim).filter(|icon| !icon.is_empty()) {
        None => Ok(DEFAULT_DISPLAY_ICON.to_owned()),
        Some(icon) if icon.chars().count() > MAX_ICON_LEN => {
            Err(PrincipalValidationError::IconTooLong { max: MAX_ICON_LEN })
        }
        Some(icon) => Ok(icon.to_owned()),
    }
}

/// Validated registration input.
///
/// Built by [`Registration::try_from_parts`], which reports every failing
/// field at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: PersonName,
    email: EmailAddress,
    phone: PhoneNumber,
    city: City,
    display_icon: String,
}

/// Raw registration fields as received from a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationParts<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub city: &'a str,
    pub display_icon: Option<&'a str>,
}

impl Registration {
    /// Validate all fields, collecting every failure.
    pub fn try_from_parts(parts: RegistrationParts<'_>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = errors.check("name", PersonName::new(parts.name));
        let email = errors.check("email", EmailAddress::new(parts.email));
        let phone = errors.check("phone", PhoneNumber::new(parts.phone));
        let city = errors.check("city", City::new(parts.city));
        let display_icon = errors.check("displayIcon", display_icon(parts.display_icon));

        match (name, email, phone, city, display_icon) {
            (Some(name), Some(email), Some(phone), Some(city), Some(display_icon))
                if errors.is_empty() =>
            {
                Ok(Self {
                    name,
                    email,
                    phone,
                    city,
                    display_icon,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }
}

/// Authenticated identity record.
///
/// Never carries secret material; this is the shape the principal store
/// returns from "find by identifier".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: PrincipalId,
    #[schema(value_type = String, example = "Priya Sharma")]
    name: PersonName,
    #[schema(value_type = String, example = "priya.sharma@example.com")]
    email: EmailAddress,
    #[schema(value_type = String, example = "+91 98765 43210")]
    phone: PhoneNumber,
    #[schema(value_type = String, example = "Mumbai")]
    city: City,
    #[schema(example = "👤")]
    display_icon: String,
}

impl Principal {
    /// Assign `id` to a validated registration.
    pub fn register(id: PrincipalId, registration: Registration) -> Self {
        let Registration {
            name,
            email,
            phone,
            city,
            display_icon,
        } = registration;
        Self {
            id,
            name,
            email,
            phone,
            city,
            display_icon,
        }
    }

    pub fn id(&self) -> &PrincipalId {
        &self.id
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn city(&self) -> &City {
        &self.city
    }

    pub fn display_icon(&self) -> &str {
        self.display_icon.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Field rules for principals and registrations.
    use super::*;
    use rstest::rstest;

    fn parts<'a>() -> RegistrationParts<'a> {
        RegistrationParts {
            name: "Priya Sharma",
            email: "priya.sharma@example.com",
            phone: "+91 98765 43210",
            city: "Mumbai",
            display_icon: None,
        }
    }

    #[rstest]
    fn registration_defaults_the_icon() {
        let registration = Registration::try_from_parts(parts()).expect("valid registration");
        let principal = Principal::register(PrincipalId::random(), registration);
        assert_eq!(principal.display_icon(), DEFAULT_DISPLAY_ICON);
        assert_eq!(principal.city().as_ref(), "Mumbai");
    }

    #[rstest]
    fn registration_reports_every_bad_field() {
        let errors = Registration::try_from_parts(RegistrationParts {
            name: " ",
            email: "not-an-email",
            city: "",
            ..parts()
        })
        .expect_err("three invalid fields");
        assert_eq!(
            errors.joined(),
            "Please add a name, Please add a valid email, Please add a city"
        );
    }

    #[rstest]
    #[case("+91 98765 43210", true)]
    #[case("9876543210", true)]
    #[case("12345", false)]
    #[case("+91-98765-43210", false)]
    #[case("call me", false)]
    fn phone_shapes(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(PhoneNumber::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn phones_compare_by_digits() {
        let spaced = PhoneNumber::new("+91 98765 43210").expect("phone");
        let packed = PhoneNumber::new("+919876543210").expect("phone");
        assert_eq!(spaced, packed);
        assert_eq!(spaced.as_ref(), "+91 98765 43210");
    }

    #[rstest]
    #[case("a@b.co", true)]
    #[case("A@B.CO", true)]
    #[case("a@b", false)]
    #[case("a b@c.de", false)]
    fn email_shapes(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn long_names_are_rejected() {
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        assert_eq!(
            PersonName::new(long),
            Err(PrincipalValidationError::NameTooLong { max: MAX_TEXT_LEN })
        );
    }

    #[rstest]
    fn principal_serializes_in_camel_case() {
        let registration = Registration::try_from_parts(RegistrationParts {
            display_icon: Some("🌱"),
            ..parts()
        })
        .expect("valid registration");
        let principal = Principal::register(PrincipalId::random(), registration);
        let json = serde_json::to_value(&principal).expect("serialize");
        assert_eq!(json["displayIcon"], "🌱");
        assert_eq!(json["phone"], "+91 98765 43210");
    }
}
