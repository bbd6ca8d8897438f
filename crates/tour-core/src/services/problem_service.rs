// ============================================================================
// Tour Core - Problem Service
// File: crates/tour-core/src/services/problem_service.rs
// ============================================================================
//! Problem reports: tourists file them, guides resolve or escalate, admins decide

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Problem, ProblemStatus, ProblemStatusChangedEvent, Tour};
use crate::error::DomainError;
use crate::notifications::{EmailService, Recipient};
use crate::repositories::{ProblemRepository, PurchaseRepository, TourRepository, UserRepository};

pub struct ProblemService {
    tours: Arc<dyn TourRepository>,
    problems: Arc<dyn ProblemRepository>,
    purchases: Arc<dyn PurchaseRepository>,
    users: Arc<dyn UserRepository>,
    email: Arc<dyn EmailService>,
}

impl ProblemService {
    pub fn new(
        tours: Arc<dyn TourRepository>,
        problems: Arc<dyn ProblemRepository>,
        purchases: Arc<dyn PurchaseRepository>,
        users: Arc<dyn UserRepository>,
        email: Arc<dyn EmailService>,
    ) -> Self {
        Self { tours, problems, purchases, users, email }
    }

    pub async fn create_problem(
        &self,
        tourist_id: Uuid,
        tour_id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Problem, DomainError> {
        let tour = self
            .tours
            .find_by_id(&tour_id)
            .await?
            .ok_or(DomainError::TourNotFound)?;

        if !self.purchases.has_purchased(&tourist_id, &tour_id).await? {
            return Err(DomainError::NotPurchased(
                "You can only report problems for tours you have purchased.".to_string(),
            ));
        }

        let problem = Problem::new(tourist_id, tour_id, title, description, Utc::now())?;
        let created = self.problems.create(&problem).await?;
        info!("Problem {} reported by tourist {} for tour {}", created.id, tourist_id, tour_id);

        self.notify_guide(&tour, &created).await;
        Ok(created)
    }

    pub async fn resolve(&self, problem_id: Uuid, guide_id: Uuid) -> Result<Problem, DomainError> {
        let mut problem = self.find(problem_id).await?;
        self.ensure_guide_owns(&problem, guide_id, "You are not authorized to resolve this problem.")
            .await?;

        let event = problem.resolve(guide_id, Utc::now())?;
        self.persist(problem, event).await
    }

    pub async fn send_to_review(&self, problem_id: Uuid, guide_id: Uuid) -> Result<Problem, DomainError> {
        let mut problem = self.find(problem_id).await?;
        self.ensure_guide_owns(
            &problem,
            guide_id,
            "You are not authorized to send this problem for review.",
        )
        .await?;

        let event = problem.send_to_review(guide_id, Utc::now())?;
        self.persist(problem, event).await
    }

    /// Admin only, enforced by the caller's role
    pub async fn reject(&self, problem_id: Uuid, admin_id: Uuid) -> Result<Problem, DomainError> {
        let mut problem = self.find(problem_id).await?;
        let event = problem.reject(admin_id, Utc::now())?;
        self.persist(problem, event).await
    }

    /// Admin only, enforced by the caller's role
    pub async fn reopen(&self, problem_id: Uuid, admin_id: Uuid) -> Result<Problem, DomainError> {
        let mut problem = self.find(problem_id).await?;
        let event = problem.reopen(admin_id, Utc::now())?;
        self.persist(problem, event).await
    }

    pub async fn get_problem(&self, problem_id: Uuid) -> Result<Problem, DomainError> {
        self.find(problem_id).await
    }

    /// Problems of one of the guide's own tours
    pub async fn problems_for_tour(&self, tour_id: Uuid, guide_id: Uuid) -> Result<Vec<Problem>, DomainError> {
        let tour = self
            .tours
            .find_by_id(&tour_id)
            .await?
            .ok_or(DomainError::TourNotFound)?;
        if !tour.is_owned_by(&guide_id) {
            return Err(DomainError::not_owner());
        }
        self.problems.find_by_tour(&tour_id).await
    }

    pub async fn problems_in_review(&self) -> Result<Vec<Problem>, DomainError> {
        self.problems.find_by_status(ProblemStatus::InReview).await
    }

    pub async fn problem_events(&self, problem_id: Uuid) -> Result<Vec<ProblemStatusChangedEvent>, DomainError> {
        self.find(problem_id).await?;
        self.problems.find_events(&problem_id).await
    }

    async fn find(&self, problem_id: Uuid) -> Result<Problem, DomainError> {
        self.problems
            .find_by_id(&problem_id)
            .await?
            .ok_or(DomainError::ProblemNotFound)
    }

    async fn ensure_guide_owns(&self, problem: &Problem, guide_id: Uuid, message: &str) -> Result<(), DomainError> {
        let owns = self
            .tours
            .find_by_id(&problem.tour_id)
            .await?
            .map(|t| t.is_owned_by(&guide_id))
            .unwrap_or(false);

        if !owns {
            warn!("Guide {} is not responsible for problem {}", guide_id, problem.id);
            return Err(DomainError::NotOwner(message.to_string()));
        }
        Ok(())
    }

    async fn persist(&self, problem: Problem, event: ProblemStatusChangedEvent) -> Result<Problem, DomainError> {
        if !self.problems.save_transition(&problem, &event).await? {
            warn!(
                "Problem {} is no longer {}, transition to {} dropped",
                problem.id,
                event.old_status.as_str(),
                event.new_status.as_str()
            );
            return Err(DomainError::changed_concurrently("Problem"));
        }
        info!(
            "Problem {} moved {} -> {} by {} {}",
            problem.id,
            event.old_status.as_str(),
            event.new_status.as_str(),
            event.changed_by_role,
            event.changed_by_user_id
        );
        Ok(problem)
    }

    async fn notify_guide(&self, tour: &Tour, problem: &Problem) {
        let guide = match self.users.find_system_user_by_id(&tour.guide_id).await {
            Ok(Some(guide)) => guide,
            Ok(None) => {
                warn!("Guide {} of tour {} not found, problem notification skipped", tour.guide_id, tour.id);
                return;
            }
            Err(e) => {
                warn!("Could not load guide {} for problem notification: {}", tour.guide_id, e);
                return;
            }
        };

        let recipient = Recipient::new(guide.email.clone(), &guide.first_name, &guide.last_name);
        if let Err(e) = self
            .email
            .send_problem_notification(&recipient, &tour.name, &problem.title, &problem.description)
            .await
        {
            warn!("Failed to notify guide about problem {}: {}", problem.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SystemUser;
    use crate::notifications::MockEmailService;
    use crate::repositories::{
        MockProblemRepository, MockPurchaseRepository, MockTourRepository, MockUserRepository,
    };
    use crate::services::tour_service::tests::published_tour;
    use tour_shared::Role;

    struct Fixture {
        tours: MockTourRepository,
        problems: MockProblemRepository,
        purchases: MockPurchaseRepository,
        users: MockUserRepository,
        email: MockEmailService,
    }

    impl Fixture {
        fn with_tour(tour: Tour) -> Self {
            let mut tours = MockTourRepository::new();
            tours.expect_find_by_id().returning(move |_| Ok(Some(tour.clone())));
            Self {
                tours,
                problems: MockProblemRepository::new(),
                purchases: MockPurchaseRepository::new(),
                users: MockUserRepository::new(),
                email: MockEmailService::new(),
            }
        }

        fn with_problem(mut self, problem: Problem) -> Self {
            self.problems
                .expect_find_by_id()
                .returning(move |_| Ok(Some(problem.clone())));
            self
        }

        fn service(self) -> ProblemService {
            ProblemService::new(
                Arc::new(self.tours),
                Arc::new(self.problems),
                Arc::new(self.purchases),
                Arc::new(self.users),
                Arc::new(self.email),
            )
        }
    }

    fn problem_for(tour: &Tour) -> Problem {
        Problem::new(Uuid::new_v4(), tour.id, "Late pickup", "Bus came 40 minutes late", Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_create_problem_notifies_guide() {
        let guide_id = Uuid::new_v4();
        let tour = published_tour(guide_id);
        let tour_id = tour.id;
        let mut fx = Fixture::with_tour(tour);
        fx.purchases.expect_has_purchased().returning(|_, _| Ok(true));
        fx.problems.expect_create().times(1).returning(|p| Ok(p.clone()));
        fx.users.expect_find_system_user_by_id().returning(move |id| {
            Ok(Some(
                SystemUser::new(*id, "guide", "guide@example.com", "Marko", "Markovic", Role::Guide, "h".into())
                    .unwrap(),
            ))
        });
        fx.email
            .expect_send_problem_notification()
            .withf(|to, tour_name, title, _| {
                to.email == "guide@example.com" && tour_name == "Danube Sunset" && title == "Lost bag"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let problem = fx
            .service()
            .create_problem(Uuid::new_v4(), tour_id, "Lost bag", "Left it on the boat")
            .await
            .unwrap();
        assert_eq!(problem.status, ProblemStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_problem_requires_purchase() {
        let tour = published_tour(Uuid::new_v4());
        let tour_id = tour.id;
        let mut fx = Fixture::with_tour(tour);
        fx.purchases.expect_has_purchased().returning(|_, _| Ok(false));
        fx.problems.expect_create().times(0);

        let err = fx
            .service()
            .create_problem(Uuid::new_v4(), tour_id, "t", "d")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_PURCHASED");
    }

    #[tokio::test]
    async fn test_resolve_by_owner_records_event() {
        let guide_id = Uuid::new_v4();
        let tour = published_tour(guide_id);
        let problem = problem_for(&tour);
        let problem_id = problem.id;
        let mut fx = Fixture::with_tour(tour).with_problem(problem);
        fx.problems
            .expect_save_transition()
            .withf(move |p, e| {
                p.status == ProblemStatus::Resolved
                    && e.old_status == ProblemStatus::Pending
                    && e.new_status == ProblemStatus::Resolved
                    && e.changed_by_role == Role::Guide
                    && e.changed_by_user_id == guide_id
            })
            .times(1)
            .returning(|_, _| Ok(true));

        let problem = fx.service().resolve(problem_id, guide_id).await.unwrap();
        assert_eq!(problem.status, ProblemStatus::Resolved);
    }

    #[tokio::test]
    async fn test_resolve_after_concurrent_transition_is_rejected() {
        let guide_id = Uuid::new_v4();
        let tour = published_tour(guide_id);
        let problem = problem_for(&tour);
        let problem_id = problem.id;
        let mut fx = Fixture::with_tour(tour).with_problem(problem);
        fx.problems.expect_save_transition().times(1).returning(|_, _| Ok(false));

        let err = fx.service().resolve(problem_id, guide_id).await.unwrap_err();
        assert_eq!(err, DomainError::changed_concurrently("Problem"));
    }

    #[tokio::test]
    async fn test_resolve_by_other_guide_is_unauthorized() {
        let tour = published_tour(Uuid::new_v4());
        let problem = problem_for(&tour);
        let problem_id = problem.id;
        let mut fx = Fixture::with_tour(tour).with_problem(problem);
        fx.problems.expect_save_transition().times(0);

        let err = fx.service().resolve(problem_id, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::NotOwner("You are not authorized to resolve this problem.".into())
        );
    }

    #[tokio::test]
    async fn test_reject_pending_problem_is_invalid() {
        let tour = published_tour(Uuid::new_v4());
        let problem = problem_for(&tour);
        let problem_id = problem.id;
        let fx = Fixture::with_tour(tour).with_problem(problem);

        let err = fx.service().reject(problem_id, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err, DomainError::invalid_operation("Only problems in review can be rejected."));
    }

    #[tokio::test]
    async fn test_reopen_in_review_problem() {
        let tour = published_tour(Uuid::new_v4());
        let mut problem = problem_for(&tour);
        problem.send_to_review(tour.guide_id, Utc::now()).unwrap();
        let problem_id = problem.id;
        let admin = Uuid::new_v4();
        let mut fx = Fixture::with_tour(tour).with_problem(problem);
        fx.problems
            .expect_save_transition()
            .withf(move |_, e| e.changed_by_role == Role::Admin && e.changed_by_user_id == admin)
            .returning(|_, _| Ok(true));

        let problem = fx.service().reopen(problem_id, admin).await.unwrap();
        assert_eq!(problem.status, ProblemStatus::Pending);
    }

    #[tokio::test]
    async fn test_missing_problem() {
        let mut fx = Fixture::with_tour(published_tour(Uuid::new_v4()));
        fx.problems.expect_find_by_id().returning(|_| Ok(None));
        let service = fx.service();
        assert_eq!(service.get_problem(Uuid::new_v4()).await.unwrap_err(), DomainError::ProblemNotFound);
        assert_eq!(
            service.problem_events(Uuid::new_v4()).await.unwrap_err(),
            DomainError::ProblemNotFound
        );
    }

    #[tokio::test]
    async fn test_problems_for_foreign_tour_are_hidden() {
        let tour = published_tour(Uuid::new_v4());
        let tour_id = tour.id;
        let mut fx = Fixture::with_tour(tour);
        fx.problems.expect_find_by_tour().times(0);

        let err = fx.service().problems_for_tour(tour_id, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
