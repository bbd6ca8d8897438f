//! Problem repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Problem, ProblemStatus, ProblemStatusChangedEvent};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn create(&self, problem: &Problem) -> Result<Problem, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Problem>, DomainError>;
    async fn find_by_tour(&self, tour_id: &Uuid) -> Result<Vec<Problem>, DomainError>;
    async fn find_by_status(&self, status: ProblemStatus) -> Result<Vec<Problem>, DomainError>;

    /// Update the status and append the event in one transaction, provided the
    /// stored status is still `event.old_status`. Returns whether it was applied.
    async fn save_transition(
        &self,
        problem: &Problem,
        event: &ProblemStatusChangedEvent,
    ) -> Result<bool, DomainError>;

    /// Oldest first
    async fn find_events(&self, problem_id: &Uuid) -> Result<Vec<ProblemStatusChangedEvent>, DomainError>;
}
