//! uw-worker — the underwriting task-execution worker binary.
//!
//! Startup sequence:
//!   1. Load layered configuration (`default.*` + `<environment>.*` + env vars)
//!   2. Build the in-memory repository and the underwriting policy (genesis
//!      defaults, optionally overridden from a policy file)
//!   3. Wire the handler registry with all thirteen task handlers
//!   4. Health-probe the orchestrator; bind the real HTTP client on success,
//!      fall back to the in-process simulated client otherwise
//!   5. In real mode, register task + workflow definitions and wait out the
//!      propagation delay before polling begins
//!   6. Spawn `worker_pool_size` pollers and run until shutdown

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use uw_client::{ClientConfig, OrchestratorClient, RealOrchestratorClient, SimulatedOrchestratorClient};
use uw_core::{default_task_definitions, underwriting_workflow_definition, METADATA_PROPAGATION_DELAY_MS};
use uw_credit::CreditCheckHandler;
use uw_decision::UnderwritingDecisionHandler;
use uw_dispatcher::{
    ConditionalApprovalHandler, CounterOfferHandler, FinalApprovalHandler, FraudDetectionHandler,
    HandlerRegistry, InterestRateHandler, ManualReviewHandler, PolicyComplianceHandler,
    ProcessDenialHandler, StateUpdateHandler,
};
use uw_genesis::{apply_overrides, load_overrides};
use uw_income::IncomeVerificationHandler;
use uw_repository::InMemoryRepository;
use uw_risk::RiskAssessmentHandler;
use uw_workflow::{validate_task_definition, validate_workflow_definition, RegistrationTracker};

#[derive(Parser, Debug)]
#[command(
    name = "uw-worker",
    version,
    about = "Underwriting task-execution worker"
)]
struct Args {
    /// Directory holding default.* and <environment>.* config files.
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Path to a JSON policy-override file (optional).
    #[arg(long)]
    policy_overrides: Option<PathBuf>,

    /// Stable identifier this worker reports to the orchestrator.
    #[arg(long)]
    worker_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let environment = uw_config::loader::detect_environment();
    let config = uw_config::load(&args.config_dir, environment).context("loading configuration")?;

    init_tracing(&config.logging);
    info!(environment = environment.as_str(), "underwriting worker starting");

    let worker_id = args
        .worker_id
        .unwrap_or_else(|| format!("uw-worker-{}", std::process::id()));

    let policy = {
        let base = uw_genesis::default_policy();
        match &args.policy_overrides {
            Some(path) => {
                let overrides = load_overrides(path).context("loading policy overrides")?;
                apply_overrides(base, &overrides)
            }
            None => base,
        }
    };

    let repository = Arc::new(InMemoryRepository::new());

    let mut registry = HandlerRegistry::new(worker_id.clone());
    registry.register(Arc::new(CreditCheckHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(IncomeVerificationHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(RiskAssessmentHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(UnderwritingDecisionHandler::new(
        repository.clone(),
        policy.clone(),
    )));
    registry.register(Arc::new(StateUpdateHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(PolicyComplianceHandler::new(
        Some(repository.clone()),
        policy.clone(),
    )));
    registry.register(Arc::new(FraudDetectionHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(InterestRateHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(FinalApprovalHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(ProcessDenialHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(ManualReviewHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(ConditionalApprovalHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(CounterOfferHandler::new(Some(repository.clone()))));

    let task_definitions = default_task_definitions();
    let registry = Arc::new(registry.with_task_definitions(&task_definitions));

    let client_config = ClientConfig {
        server_url: config.conductor.server_url.clone(),
        worker_pool_size: config.conductor.worker_pool_size,
        polling_interval_ms: config.conductor.polling_interval_ms,
        update_retry_base_ms: config.conductor.update_retry_time_ms,
        max_retry_attempts: config.conductor.max_retry_attempts,
        ..ClientConfig::default()
    };

    let real_client = RealOrchestratorClient::new(client_config.clone());
    let client: Arc<dyn OrchestratorClient> = match real_client.health_check().await {
        Ok(true) => {
            info!(server_url = %client_config.server_url, "orchestrator reachable, using real client");
            bootstrap_real_orchestrator(
                &real_client,
                &task_definitions,
                config.conductor.min_taskdef_registrations,
            )
            .await;
            Arc::new(real_client)
        }
        Ok(false) | Err(_) => {
            warn!("orchestrator unreachable, falling back to simulated client");
            Arc::new(SimulatedOrchestratorClient::new())
        }
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut pollers = Vec::with_capacity(client_config.worker_pool_size);
    for index in 0..client_config.worker_pool_size {
        let poller_id = format!("{worker_id}-{index}");
        let client = client.clone();
        let dispatch = registry.clone();
        let poller_config = client_config.clone();
        let shutdown_rx = shutdown_rx.clone();
        pollers.push(tokio::spawn(async move {
            uw_client::run_poller(poller_id, client, dispatch, poller_config, shutdown_rx).await
        }));
    }

    info!(pool_size = client_config.worker_pool_size, "pollers started");
    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;

    info!("shutdown signal received, draining pollers");
    let _ = shutdown_tx.send(true);
    let grace = Duration::from_secs(uw_core::DEFAULT_SHUTDOWN_GRACE_SECS);
    match tokio::time::timeout(grace, drain_pollers(pollers)).await {
        Ok(()) => info!("all pollers stopped cleanly"),
        Err(_) => warn!("shutdown grace period elapsed with pollers still running"),
    }

    Ok(())
}

async fn drain_pollers(handles: Vec<tokio::task::JoinHandle<()>>) {
    for handle in handles {
        let _ = handle.await;
    }
}

/// Registers task and workflow definitions with the orchestrator. Readiness
/// only requires [`uw_workflow::RegistrationTracker::is_ready`] (spec.md §9
/// Open Question) — a handful of slow auxiliary registrations shouldn't hold
/// up the core five from polling.
async fn bootstrap_real_orchestrator(
    client: &RealOrchestratorClient,
    task_definitions: &[uw_core::TaskDefinition],
    min_taskdef_registrations: usize,
) {
    let mut tracker = RegistrationTracker::new().with_min_required(min_taskdef_registrations);
    for def in task_definitions {
        if let Err(e) = validate_task_definition(def) {
            warn!(task_type = %def.name, error = %e, "task definition failed validation, skipping registration");
            continue;
        }
        match client.register_task_definition(def).await {
            Ok(()) => tracker.record(&def.name),
            Err(e) => warn!(task_type = %def.name, error = %e, "task definition registration failed"),
        }
    }

    if tracker.is_ready() {
        info!(registered = tracker.count(), "task definitions registered");
    } else {
        warn!(
            registered = tracker.count(),
            "fewer than the minimum task definitions registered, continuing anyway"
        );
    }

    let workflow = underwriting_workflow_definition();
    match validate_workflow_definition(&workflow) {
        Ok(()) => match client.register_workflow_definition(&workflow).await {
            Ok(()) => info!(workflow = %workflow.name, "workflow definition registered"),
            Err(e) => warn!(error = %e, "workflow definition registration failed, continuing in definitions-only mode"),
        },
        Err(e) => warn!(error = %e, "workflow definition failed validation, continuing in definitions-only mode"),
    }

    tokio::time::sleep(Duration::from_millis(METADATA_PROPAGATION_DELAY_MS)).await;
}

fn init_tracing(logging: &uw_config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.parse().unwrap_or_else(|_| "info".parse().unwrap()));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
