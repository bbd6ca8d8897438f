//! Repository traits (ports)

pub mod tour_repository;
pub mod purchase_repository;
pub mod rating_repository;
pub mod problem_repository;
pub mod user_repository;
pub mod login_attempt_repository;

pub use tour_repository::TourRepository;
pub use purchase_repository::PurchaseRepository;
pub use rating_repository::RatingRepository;
pub use problem_repository::ProblemRepository;
pub use user_repository::UserRepository;
pub use login_attempt_repository::LoginAttemptRepository;

#[cfg(any(test, feature = "mocks"))]
pub use tour_repository::MockTourRepository;
#[cfg(any(test, feature = "mocks"))]
pub use purchase_repository::MockPurchaseRepository;
#[cfg(any(test, feature = "mocks"))]
pub use rating_repository::MockRatingRepository;
#[cfg(any(test, feature = "mocks"))]
pub use problem_repository::MockProblemRepository;
#[cfg(any(test, feature = "mocks"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "mocks"))]
pub use login_attempt_repository::MockLoginAttemptRepository;
