//! Business logic services

pub mod authz;
pub mod availability;
pub mod catalog;
pub mod email;
pub mod intake;
pub mod ledger;
pub mod notifications;
pub mod status;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub authz: authz::AuthorizationPolicy,
    pub catalog: catalog::CatalogService,
    pub ledger: ledger::ReservationLedger,
    pub availability: availability::AvailabilityCoordinator,
    pub notifications: notifications::NotificationService,
}

impl Services {
    /// Create all services with the given repository, sending
    /// notifications by email
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let notifier = Arc::new(email::EmailService::new(config.email.clone()));
        Self::with_notifier(repository, config, notifier)
    }

    /// Create all services with a custom notification channel
    pub fn with_notifier(
        repository: Repository,
        config: &AppConfig,
        notifier: Arc<dyn email::ReservationNotifier>,
    ) -> Self {
        let ledger = ledger::ReservationLedger::new(repository.clone());
        let notifications = notifications::NotificationService::new(repository.clone(), notifier);

        Self {
            authz: authz::AuthorizationPolicy::new(repository.clone(), &config.auth),
            catalog: catalog::CatalogService::new(repository.clone(), ledger.clone()),
            availability: availability::AvailabilityCoordinator::new(
                repository.clone(),
                ledger.clone(),
                notifications.clone(),
                config.reservations.clone(),
            ),
            ledger,
            notifications,
            repository,
        }
    }
}
