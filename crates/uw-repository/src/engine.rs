//! In-memory implementation of the [`crate::Repository`] capability.
//!
//! One `RwLock<HashMap<...>>` per entity type, following the teacher's
//! one-tree-per-entity storage layout — here each "tree" is an in-memory
//! map keyed by application id instead of a `sled::Tree`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use uw_core::{CreditReport, IncomeVerification, LoanApplication, RiskAssessment, WorkerError, WorkerResult};

use crate::repository::Repository;

#[derive(Default)]
pub struct InMemoryRepository {
    applications: RwLock<HashMap<String, LoanApplication>>,
    credit_reports: RwLock<HashMap<String, CreditReport>>,
    risk_assessments: RwLock<HashMap<String, RiskAssessment>>,
    income_verifications: RwLock<HashMap<String, IncomeVerification>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_application(&self, application_id: &str) -> WorkerResult<Option<LoanApplication>> {
        Ok(self.applications.read().unwrap().get(application_id).cloned())
    }

    async fn put_application(&self, application: LoanApplication) -> WorkerResult<()> {
        debug!(application_id = %application.id, "storing application");
        self.applications
            .write()
            .unwrap()
            .insert(application.id.clone(), application);
        Ok(())
    }

    async fn update_application_state(
        &self,
        application_id: &str,
        new_state: &str,
    ) -> WorkerResult<(String, String)> {
        let mut applications = self.applications.write().unwrap();
        let application = applications
            .get_mut(application_id)
            .ok_or_else(|| WorkerError::ApplicationNotFound(application_id.to_string()))?;
        let previous = application.current_state.clone();
        application.current_state = new_state.to_string();
        Ok((previous, new_state.to_string()))
    }

    async fn get_credit_report(&self, application_id: &str) -> WorkerResult<Option<CreditReport>> {
        Ok(self
            .credit_reports
            .read()
            .unwrap()
            .get(application_id)
            .cloned())
    }

    async fn put_credit_report(&self, application_id: &str, report: CreditReport) -> WorkerResult<()> {
        self.credit_reports
            .write()
            .unwrap()
            .insert(application_id.to_string(), report);
        Ok(())
    }

    async fn get_risk_assessment(&self, application_id: &str) -> WorkerResult<Option<RiskAssessment>> {
        Ok(self
            .risk_assessments
            .read()
            .unwrap()
            .get(application_id)
            .cloned())
    }

    async fn put_risk_assessment(
        &self,
        application_id: &str,
        assessment: RiskAssessment,
    ) -> WorkerResult<()> {
        self.risk_assessments
            .write()
            .unwrap()
            .insert(application_id.to_string(), assessment);
        Ok(())
    }

    async fn get_income_verification(
        &self,
        application_id: &str,
    ) -> WorkerResult<Option<IncomeVerification>> {
        Ok(self
            .income_verifications
            .read()
            .unwrap()
            .get(application_id)
            .cloned())
    }

    async fn put_income_verification(
        &self,
        application_id: &str,
        verification: IncomeVerification,
    ) -> WorkerResult<()> {
        self.income_verifications
            .write()
            .unwrap()
            .insert(application_id.to_string(), verification);
        Ok(())
    }
}
