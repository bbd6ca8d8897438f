//! Request and response DTOs (camelCase on the wire)

pub mod auth;
pub mod tour;
pub mod cart;
pub mod purchase;
pub mod rating;
pub mod problem;

pub use auth::{LoginRequest, RegisterTouristRequest};
pub use cart::CartItemRequest;
pub use problem::{CreateProblemRequest, ProblemEventResponse, ProblemResponse};
pub use purchase::ConfirmPurchaseQuery;
pub use rating::{AverageRatingResponse, CreateRatingRequest, RatingResponse};
pub use tour::{AddKeyPointRequest, CreateTourRequest, KeyPointResponse, SortQuery, TourResponse};
