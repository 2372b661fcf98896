//! Services module
//!
//! This module contains business logic services

pub mod availability;
pub mod catalog;
pub mod profile;
pub mod reconciliation;
pub mod registration;

// Re-export commonly used services
pub use availability::{event_phase, is_registration_open, EventPhase};
pub use catalog::CatalogService;
pub use profile::ProfileService;
pub use reconciliation::PaymentService;
pub use registration::RegistrationService;

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::gateway::PaymentGateway;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub registration_service: RegistrationService,
    pub payment_service: PaymentService,
    pub profile_service: ProfileService,
    pub catalog_service: CatalogService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(
        settings: &Settings,
        database: &DatabaseService,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let registration_service = RegistrationService::new(
            database.events.clone(),
            database.participants.clone(),
            database.teams.clone(),
        );
        let payment_service = PaymentService::new(
            gateway,
            database.events.clone(),
            database.participants.clone(),
            database.payments.clone(),
            settings.gateway.currency.clone(),
        );
        let profile_service = ProfileService::new(
            database.profiles.clone(),
            database.participants.clone(),
        );
        let catalog_service = CatalogService::new(database.events.clone());

        Self {
            registration_service,
            payment_service,
            profile_service,
            catalog_service,
        }
    }
}
