// ============================================================================
// Tour Core - Problem Entity
// File: crates/tour-core/src/domain/problem.rs
// Description: Tourist-reported problem and its status state machine
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tour_shared::Role;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProblemStatus {
    #[default]
    Pending,
    InReview,
    Resolved,
    Rejected,
}

impl ProblemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemStatus::Pending => "Pending",
            ProblemStatus::InReview => "InReview",
            ProblemStatus::Resolved => "Resolved",
            ProblemStatus::Rejected => "Rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ProblemStatus::Pending),
            "inreview" | "in_review" => Some(ProblemStatus::InReview),
            "resolved" => Some(ProblemStatus::Resolved),
            "rejected" => Some(ProblemStatus::Rejected),
            _ => None,
        }
    }

    /// Transition table: Pending -> InReview | Resolved, InReview -> Rejected | Pending
    pub fn can_transition_to(&self, next: ProblemStatus) -> bool {
        matches!(
            (self, next),
            (ProblemStatus::Pending, ProblemStatus::InReview)
                | (ProblemStatus::Pending, ProblemStatus::Resolved)
                | (ProblemStatus::InReview, ProblemStatus::Rejected)
                | (ProblemStatus::InReview, ProblemStatus::Pending)
        )
    }
}

/// Immutable audit record of one status change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStatusChangedEvent {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub old_status: ProblemStatus,
    pub new_status: ProblemStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by_role: Role,
    pub changed_by_user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Problem {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub tour_id: Uuid,

    #[validate(length(min = 1, message = "Title cannot be empty."))]
    pub title: String,

    #[validate(length(min = 1, message = "Description cannot be empty."))]
    pub description: String,

    pub status: ProblemStatus,
    pub created_at: DateTime<Utc>,
}

impl Problem {
    pub fn new(
        tourist_id: Uuid,
        tour_id: Uuid,
        title: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let problem = Self {
            id: Uuid::new_v4(),
            tourist_id,
            tour_id,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            status: ProblemStatus::Pending,
            created_at: now,
        };

        problem.validate()?;
        Ok(problem)
    }

    /// Guide marks a pending problem as resolved
    pub fn resolve(
        &mut self,
        guide_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ProblemStatusChangedEvent, DomainError> {
        self.transition(
            ProblemStatus::Resolved,
            Role::Guide,
            guide_id,
            now,
            "Only pending problems can be resolved.",
        )
    }

    /// Guide escalates a pending problem to the administrators
    pub fn send_to_review(
        &mut self,
        guide_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ProblemStatusChangedEvent, DomainError> {
        self.transition(
            ProblemStatus::InReview,
            Role::Guide,
            guide_id,
            now,
            "Only pending problems can be sent for review.",
        )
    }

    pub fn reject(
        &mut self,
        admin_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ProblemStatusChangedEvent, DomainError> {
        self.transition(
            ProblemStatus::Rejected,
            Role::Admin,
            admin_id,
            now,
            "Only problems in review can be rejected.",
        )
    }

    /// Admin sends a problem in review back to the guide
    pub fn reopen(
        &mut self,
        admin_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ProblemStatusChangedEvent, DomainError> {
        self.transition(
            ProblemStatus::Pending,
            Role::Admin,
            admin_id,
            now,
            "Only problems in review can be reopened.",
        )
    }

    fn transition(
        &mut self,
        next: ProblemStatus,
        role: Role,
        actor_id: Uuid,
        now: DateTime<Utc>,
        rejection: &str,
    ) -> Result<ProblemStatusChangedEvent, DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_operation(rejection));
        }

        let event = ProblemStatusChangedEvent {
            id: Uuid::new_v4(),
            problem_id: self.id,
            old_status: self.status,
            new_status: next,
            changed_at: now,
            changed_by_role: role,
            changed_by_user_id: actor_id,
        };
        self.status = next;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Problem {
        Problem::new(Uuid::new_v4(), Uuid::new_v4(), "Bus late", "Waited an hour", Utc::now()).unwrap()
    }

    #[test]
    fn test_new_problem_is_pending() {
        let problem = pending();
        assert_eq!(problem.status, ProblemStatus::Pending);
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let err = Problem::new(Uuid::new_v4(), Uuid::new_v4(), " ", "d", Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("Title cannot be empty."));
    }

    #[test]
    fn test_resolve_emits_event() {
        let mut problem = pending();
        let guide = Uuid::new_v4();
        let now = Utc::now();

        let event = problem.resolve(guide, now).unwrap();
        assert_eq!(problem.status, ProblemStatus::Resolved);
        assert_eq!(event.problem_id, problem.id);
        assert_eq!(event.old_status, ProblemStatus::Pending);
        assert_eq!(event.new_status, ProblemStatus::Resolved);
        assert_eq!(event.changed_by_role, Role::Guide);
        assert_eq!(event.changed_by_user_id, guide);
        assert_eq!(event.changed_at, now);
    }

    #[test]
    fn test_review_then_reopen_then_resolve() {
        let mut problem = pending();
        problem.send_to_review(Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(problem.status, ProblemStatus::InReview);

        let event = problem.reopen(Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(event.changed_by_role, Role::Admin);
        assert_eq!(problem.status, ProblemStatus::Pending);

        problem.resolve(Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(problem.status, ProblemStatus::Resolved);
    }

    #[test]
    fn test_illegal_transitions_keep_status() {
        let mut problem = pending();
        assert_eq!(
            problem.reject(Uuid::new_v4(), Utc::now()).unwrap_err(),
            DomainError::invalid_operation("Only problems in review can be rejected.")
        );
        assert_eq!(
            problem.reopen(Uuid::new_v4(), Utc::now()).unwrap_err(),
            DomainError::invalid_operation("Only problems in review can be reopened.")
        );
        assert_eq!(problem.status, ProblemStatus::Pending);

        problem.send_to_review(Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(
            problem.resolve(Uuid::new_v4(), Utc::now()).unwrap_err(),
            DomainError::invalid_operation("Only pending problems can be resolved.")
        );
        assert_eq!(
            problem.send_to_review(Uuid::new_v4(), Utc::now()).unwrap_err(),
            DomainError::invalid_operation("Only pending problems can be sent for review.")
        );

        problem.reject(Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(problem.status, ProblemStatus::Rejected);
        assert!(problem.reopen(Uuid::new_v4(), Utc::now()).is_err());
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [ProblemStatus::Resolved, ProblemStatus::Rejected] {
            for next in [
                ProblemStatus::Pending,
                ProblemStatus::InReview,
                ProblemStatus::Resolved,
                ProblemStatus::Rejected,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }
}
