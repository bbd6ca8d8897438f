//! Domain entities

pub mod tour;
pub mod problem;
pub mod purchase;
pub mod rating;
pub mod user;
pub mod login_attempt;
pub mod cart;

pub use tour::{Difficulty, Interest, KeyPoint, Tour, TourStatus, TourVersion};
pub use problem::{Problem, ProblemStatus, ProblemStatusChangedEvent};
pub use purchase::{applicable_bonus_points, BonusRefund, Purchase, PurchasedTour, BONUS_POINTS_PER_PURCHASE};
pub use rating::Rating;
pub use user::{SystemUser, Tourist};
pub use login_attempt::{LoginAttemptTracker, MAX_BLOCK_COUNT, MAX_FAILED_ATTEMPTS};
pub use cart::CartItem;
