//! The `generate_counter_offer` auxiliary handler (spec.md §4.9). Fixed
//! 75%-of-requested / 12.5% terms, independent of the `critical`-branch
//! counter-offer `underwriting_decision` computes from the policy matrix.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use uw_core::{round_money, Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot, LoanApplication, Task, WorkerResult, OFFER_EXPIRATION_DAYS};
use uw_repository::Repository;

const COUNTER_OFFER_FRACTION: f64 = 0.75;
const COUNTER_OFFER_RATE: f64 = 12.5;

pub struct CounterOfferHandler {
    repository: Option<Arc<dyn Repository>>,
    metrics: HandlerMetrics,
}

impl CounterOfferHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            metrics: HandlerMetrics::default(),
        }
    }

    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let user_id = task.str_or("userId", "unknown");

        let requested_amount = match task.input_data.get("requestedAmount").and_then(Value::as_f64) {
            Some(amount) => amount,
            None => {
                let application = match &self.repository {
                    Some(repo) => repo
                        .get_application(application_id)
                        .await?
                        .unwrap_or_else(|| LoanApplication::synthesize(application_id, user_id)),
                    None => LoanApplication::synthesize(application_id, user_id),
                };
                application.loan_amount
            }
        };

        let counter_offer_amount = round_money(requested_amount * COUNTER_OFFER_FRACTION);
        let expiration_date = chrono::Utc::now() + chrono::Duration::days(OFFER_EXPIRATION_DAYS);

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("counterOfferAmount".into(), counter_offer_amount.into());
        output.insert("counterOfferRate".into(), COUNTER_OFFER_RATE.into());
        output.insert("expirationDate".into(), expiration_date.to_rfc3339().into());
        Ok(output)
    }
}

#[async_trait]
impl Handler for CounterOfferHandler {
    fn task_type(&self) -> &'static str {
        "generate_counter_offer"
    }

    async fn execute(&self, _ctx: &HandlerContext, task: &Task) -> WorkerResult<Map<String, Value>> {
        let started = std::time::Instant::now();
        let result = self.run(task).await;
        match &result {
            Ok(_) => self.metrics.record_completed(started.elapsed()),
            Err(_) => self.metrics.record_failed(started.elapsed()),
        }
        result
    }

    fn metrics(&self) -> HandlerMetricsSnapshot {
        self.metrics.snapshot()
    }
}
