//! Application services

pub mod tour_service;
pub mod replacement_service;
pub mod cart_service;
pub mod purchase_service;
pub mod rating_service;
pub mod problem_service;
pub mod background_job_service;
pub mod auth_service;
pub mod admin_service;

pub use tour_service::{AddKeyPointInput, CreateTourInput, TourService};
pub use replacement_service::ReplacementService;
pub use cart_service::{CartService, CartView};
pub use purchase_service::{PurchaseReceipt, PurchaseService, PurchasedTourLine};
pub use rating_service::RatingService;
pub use problem_service::ProblemService;
pub use background_job_service::{
    BackgroundJobService, CanceledTourReport, CancellationReport, JobRunReport, ReminderReport,
    TourReminderReport,
};
pub use auth_service::{AuthResult, AuthService, RegisterTouristInput};
pub use admin_service::{AdminService, BlockedUser};
