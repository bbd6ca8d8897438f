use serde::Deserialize;
use validator::Validate;

use tour_core::domain::Interest;
use tour_core::services::RegisterTouristInput;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTouristRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters."))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub interests: Vec<Interest>,
    #[serde(default)]
    pub wants_recommendations: bool,
}

impl From<RegisterTouristRequest> for RegisterTouristInput {
    fn from(req: RegisterTouristRequest) -> Self {
        RegisterTouristInput {
            username: req.username,
            password: req.password,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            interests: req.interests,
            wants_recommendations: req.wants_recommendations,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}
