use std::sync::Arc;

use tour_core::services::{
    AdminService, AuthService, BackgroundJobService, CartService, ProblemService, PurchaseService,
    RatingService, ReplacementService, TourService,
};
use tour_security::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub tours: Arc<TourService>,
    pub replacements: Arc<ReplacementService>,
    pub carts: Arc<CartService>,
    pub purchases: Arc<PurchaseService>,
    pub ratings: Arc<RatingService>,
    pub problems: Arc<ProblemService>,
    pub jobs: Arc<BackgroundJobService>,
    pub auth: Arc<AuthService>,
    pub admin: Arc<AdminService>,
    pub jwt: JwtService,
}
