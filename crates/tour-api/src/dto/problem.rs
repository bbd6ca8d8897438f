use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tour_core::domain::{Problem, ProblemStatus, ProblemStatusChangedEvent};
use tour_shared::Role;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProblemRequest {
    pub tour_id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemResponse {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub tour_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ProblemStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self {
            id: p.id,
            tourist_id: p.tourist_id,
            tour_id: p.tour_id,
            title: p.title,
            description: p.description,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemEventResponse {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub old_status: ProblemStatus,
    pub new_status: ProblemStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by_role: Role,
    pub changed_by_user_id: Uuid,
}

impl From<ProblemStatusChangedEvent> for ProblemEventResponse {
    fn from(e: ProblemStatusChangedEvent) -> Self {
        Self {
            id: e.id,
            problem_id: e.problem_id,
            old_status: e.old_status,
            new_status: e.new_status,
            changed_at: e.changed_at,
            changed_by_role: e.changed_by_role,
            changed_by_user_id: e.changed_by_user_id,
        }
    }
}
