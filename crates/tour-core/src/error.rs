//! Domain errors
//!
//! Every variant maps to one stable wire code via [`DomainError::code`]; the
//! `Display` text is the message shown to API clients.

use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("Tour not found.")]
    TourNotFound,

    #[error("{0}")]
    TourNotFoundNamed(String),

    #[error("{0}")]
    NotOwner(String),

    #[error("{0}")]
    PublishFailed(String),

    #[error("{0}")]
    TourNotPublished(String),

    #[error("This tour is already in your cart.")]
    TourAlreadyInCart,

    #[error("Your cart is empty.")]
    CartEmpty,

    #[error("This tour is not in your cart.")]
    TourNotInCart,

    #[error("Tourist not found.")]
    TouristNotFound,

    #[error("{0}")]
    NotPurchased(String),

    #[error("You have already rated this tour.")]
    AlreadyRated,

    #[error("Problem not found.")]
    ProblemNotFound,

    #[error("This tour is not available for takeover.")]
    NotAvailable,

    #[error("You already have a tour scheduled on this date.")]
    ScheduleConflict,

    #[error("Username is already taken.")]
    UsernameExists,

    #[error("Email is already registered.")]
    EmailExists,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("{0}")]
    AccountLocked(String),

    #[error("No login tracker found for user '{0}'.")]
    UserNotFound(String),

    #[error("User '{0}' is not currently blocked.")]
    NotBlocked(String),

    #[error("User '{username}' cannot be unblocked. User has been blocked {block_count} times (maximum is {max}).")]
    CannotUnblock {
        username: String,
        block_count: i32,
        max: i32,
    },

    #[error("Cannot spend {requested} bonus points. Available: {available}.")]
    InsufficientBonusPoints { requested: i32, available: i32 },

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Stable error code sent in the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ValidationError(_) => "VALIDATION_ERROR",
            DomainError::InvalidOperation(_) => "INVALID_OPERATION",
            DomainError::TourNotFound | DomainError::TourNotFoundNamed(_) => "TOUR_NOT_FOUND",
            DomainError::NotOwner(_) => "UNAUTHORIZED",
            DomainError::PublishFailed(_) => "PUBLISH_FAILED",
            DomainError::TourNotPublished(_) => "TOUR_NOT_PUBLISHED",
            DomainError::TourAlreadyInCart => "TOUR_ALREADY_IN_CART",
            DomainError::CartEmpty => "CART_EMPTY",
            DomainError::TourNotInCart => "TOUR_NOT_IN_CART",
            DomainError::TouristNotFound => "TOURIST_NOT_FOUND",
            DomainError::NotPurchased(_) => "NOT_PURCHASED",
            DomainError::AlreadyRated => "ALREADY_RATED",
            DomainError::ProblemNotFound => "PROBLEM_NOT_FOUND",
            DomainError::NotAvailable => "NOT_AVAILABLE",
            DomainError::ScheduleConflict => "SCHEDULE_CONFLICT",
            DomainError::UsernameExists => "USERNAME_EXISTS",
            DomainError::EmailExists => "EMAIL_EXISTS",
            DomainError::InvalidCredentials => "INVALID_CREDENTIALS",
            DomainError::AccountLocked(_) => "ACCOUNT_LOCKED",
            DomainError::UserNotFound(_) => "USER_NOT_FOUND",
            DomainError::NotBlocked(_) => "NOT_BLOCKED",
            DomainError::CannotUnblock { .. } => "CANNOT_UNBLOCK",
            DomainError::InsufficientBonusPoints { .. } => "INSUFFICIENT_BONUS_POINTS",
            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::DatabaseError(_)
            | DomainError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Infrastructure failure rather than a business rule
    pub fn is_internal(&self) -> bool {
        self.code() == "INTERNAL_ERROR"
    }

    pub fn not_owner() -> Self {
        DomainError::NotOwner("You are not the owner of this tour.".to_string())
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        DomainError::InvalidOperation(message.into())
    }

    /// Another request changed the record between load and save
    pub fn changed_concurrently(what: &str) -> Self {
        DomainError::InvalidOperation(format!(
            "{} was changed by another request. Please try again.",
            what
        ))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::ValidationError(message.into())
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::ValidationError(validation_message(&errors))
    }
}

/// Flatten field errors into one sentence list, ordered by field name
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid.", field),
            })
        })
        .collect();

    if messages.is_empty() {
        "Validation failed.".to_string()
    } else {
        messages.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(DomainError::TourNotFound.code(), "TOUR_NOT_FOUND");
        assert_eq!(DomainError::TourNotFoundNamed("x".into()).code(), "TOUR_NOT_FOUND");
        assert_eq!(DomainError::not_owner().code(), "UNAUTHORIZED");
        assert_eq!(
            DomainError::CannotUnblock { username: "a".into(), block_count: 3, max: 3 }.code(),
            "CANNOT_UNBLOCK"
        );
        assert_eq!(DomainError::DatabaseError("boom".into()).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_internal_errors_are_flagged() {
        assert!(DomainError::DatabaseError("x".into()).is_internal());
        assert!(DomainError::PasswordHashError("x".into()).is_internal());
        assert!(!DomainError::CartEmpty.is_internal());
    }

    #[test]
    fn test_cannot_unblock_message() {
        let err = DomainError::CannotUnblock { username: "john_doe".into(), block_count: 3, max: 3 };
        assert_eq!(
            err.to_string(),
            "User 'john_doe' cannot be unblocked. User has been blocked 3 times (maximum is 3)."
        );
    }
}
