//! Business logic services

pub mod financial;
pub mod ingestion;
pub mod matching;
pub mod notifications;
pub mod orchestrator;
pub mod rules;
pub mod tasks;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

use financial::FinancialReporting;
use notifications::NotificationSender;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub ingestion: ingestion::IngestionService,
    pub matching: matching::MatchingService,
    pub orchestrator: orchestrator::OrchestratorService,
    pub tasks: tasks::TaskGeneratorService,
    pub rules: rules::RuleEvaluatorService,
}

impl Services {
    /// Wire all services over one repository and the injected collaborators.
    pub fn new(
        repository: Repository,
        config: &AppConfig,
        notifier: Arc<dyn NotificationSender>,
        financial: Arc<dyn FinancialReporting>,
    ) -> Self {
        let matching = matching::MatchingService::new(
            repository.owners.clone(),
            config.matching.clone(),
        );
        let tasks = tasks::TaskGeneratorService::new(
            repository.staff.clone(),
            repository.staff_tasks.clone(),
            config.tasks.clone(),
        );
        Self {
            ingestion: ingestion::IngestionService::new(
                repository.bookings.clone(),
                config.ingestion.clone(),
            ),
            orchestrator: orchestrator::OrchestratorService::new(
                repository.clone(),
                matching.clone(),
                tasks.clone(),
                notifier.clone(),
                financial,
            ),
            rules: rules::RuleEvaluatorService::new(
                repository.clone(),
                matching.clone(),
                notifier,
            ),
            matching,
            tasks,
        }
    }
}
