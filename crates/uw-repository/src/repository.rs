//! The repository capability (spec.md §1 Non-goal note: "storage
//! implementation is out of scope" — but the abstract capability shape
//! handlers depend on is very much in scope). Handlers hold
//! `Option<Arc<dyn Repository>>`; when `None`, each handler synthesizes
//! deterministic mock data per its own documented fallback.

use async_trait::async_trait;

use uw_core::{CreditReport, IncomeVerification, LoanApplication, RiskAssessment, WorkerResult};

#[async_trait]
pub trait Repository: Send + Sync {
    async fn get_application(&self, application_id: &str) -> WorkerResult<Option<LoanApplication>>;
    async fn put_application(&self, application: LoanApplication) -> WorkerResult<()>;

    /// Update `current_state` in place, returning `(previous, new)`.
    async fn update_application_state(
        &self,
        application_id: &str,
        new_state: &str,
    ) -> WorkerResult<(String, String)>;

    async fn get_credit_report(&self, application_id: &str) -> WorkerResult<Option<CreditReport>>;
    async fn put_credit_report(&self, application_id: &str, report: CreditReport) -> WorkerResult<()>;

    async fn get_risk_assessment(&self, application_id: &str) -> WorkerResult<Option<RiskAssessment>>;
    async fn put_risk_assessment(
        &self,
        application_id: &str,
        assessment: RiskAssessment,
    ) -> WorkerResult<()>;

    async fn get_income_verification(
        &self,
        application_id: &str,
    ) -> WorkerResult<Option<IncomeVerification>>;
    async fn put_income_verification(
        &self,
        application_id: &str,
        verification: IncomeVerification,
    ) -> WorkerResult<()>;
}
