/// Request schemas for user endpoints
///
/// Two schemas, one per write operation:
///
/// - [`CreateUserRequest`]: every field required. [`CreateUserRequest::check`]
///   turns it into a [`NewAccount`] with no optional fields left.
/// - [`UpdateUserRequest`]: every field optional, plus three conditional
///   rules evaluated in a fixed order after the per-field formats:
///   1. [`phone_matches_old_phone`]
///   2. [`password_present_with_old_password`]
///   3. [`confirmation_matches_password`]
///
/// Schemas are plain types; nothing here is shared between requests except
/// the compiled [`PHONE_REGEX`].
///
/// # Example
///
/// ```
/// use accounts_api::validation::{CreateUserRequest, UpdateUserRequest};
///
/// let create = CreateUserRequest {
///     name: Some("A".to_string()),
///     email: Some("a@x.com".to_string()),
///     phone: Some("(11) 91234-5678".to_string()),
///     password: Some("secret1".to_string()),
/// };
/// assert!(create.check().is_ok());
///
/// let update = UpdateUserRequest {
///     old_password: Some("secret1".to_string()),
///     ..Default::default()
/// };
/// assert!(update.check().is_err()); // password required alongside oldPassword
/// ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

/// `(DD) DDDD-DDDD` or `(DD) DDDDD-DDDD`, ASCII digits only
pub static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\([0-9]{2}\) [0-9]{4,5}-[0-9]{4}$").expect("phone pattern compiles")
});

/// Why a payload was rejected
///
/// Only logged; callers see the generic validation-failed message.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("field validation failed: {0}")]
    Fields(#[from] ValidationErrors),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("phone must be present and equal oldPhone")]
    PhoneMismatch,

    #[error("password is required when oldPassword is given")]
    PasswordRequired,

    #[error("confirmPassword must be present and equal password")]
    ConfirmationMismatch,
}

/// Returns true if `phone` has the accepted shape
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Body of `POST /users`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,

    #[validate(required, email)]
    pub email: Option<String>,

    #[validate(required, regex(path = *PHONE_REGEX))]
    pub phone: Option<String>,

    #[validate(required, length(min = 6))]
    pub password: Option<String>,
}

/// A create payload that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl CreateUserRequest {
    /// Validates the payload and unwraps every field
    ///
    /// # Errors
    ///
    /// Returns the first reason the payload is unacceptable.
    pub fn check(self) -> Result<NewAccount, SchemaError> {
        self.validate()?;

        let name = self.name.ok_or(SchemaError::MissingField("name"))?;
        let email = self.email.ok_or(SchemaError::MissingField("email"))?;
        let phone = self.phone.ok_or(SchemaError::MissingField("phone"))?;
        let password = self.password.ok_or(SchemaError::MissingField("password"))?;

        Ok(NewAccount {
            name,
            email,
            phone,
            password,
        })
    }
}

/// Body of `PUT /users`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_REGEX))]
    pub old_phone: Option<String>,

    #[validate(regex(path = *PHONE_REGEX))]
    pub phone: Option<String>,

    #[validate(length(min = 6))]
    pub old_password: Option<String>,

    #[validate(length(min = 6))]
    pub password: Option<String>,

    pub confirm_password: Option<String>,
}

impl UpdateUserRequest {
    /// Runs field formats, then the conditional rules in order
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn check(&self) -> Result<(), SchemaError> {
        self.validate()?;

        phone_matches_old_phone(self)?;
        password_present_with_old_password(self)?;
        confirmation_matches_password(self)?;

        Ok(())
    }
}

/// With `oldPhone` present, `phone` is required and must equal it
pub fn phone_matches_old_phone(req: &UpdateUserRequest) -> Result<(), SchemaError> {
    match (&req.old_phone, &req.phone) {
        (None, _) => Ok(()),
        (Some(old), Some(new)) if old == new => Ok(()),
        (Some(_), _) => Err(SchemaError::PhoneMismatch),
    }
}

/// With `oldPassword` present, `password` is required
pub fn password_present_with_old_password(req: &UpdateUserRequest) -> Result<(), SchemaError> {
    if req.old_password.is_some() && req.password.is_none() {
        return Err(SchemaError::PasswordRequired);
    }
    Ok(())
}

/// With `password` present, `confirmPassword` is required and must equal it
pub fn confirmation_matches_password(req: &UpdateUserRequest) -> Result<(), SchemaError> {
    match (&req.password, &req.confirm_password) {
        (None, _) => Ok(()),
        (Some(password), Some(confirm)) if password == confirm => Ok(()),
        (Some(_), _) => Err(SchemaError::ConfirmationMismatch),
    }
}
