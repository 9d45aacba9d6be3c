//! The in-process task dispatcher: a [`HandlerRegistry`] implementing
//! `uw_client::TaskDispatch`, plus every handler beyond the five core ones
//! built in uw-credit/uw-income/uw-risk/uw-decision — state updates and the
//! eight auxiliary underwriting tasks (spec.md §4.8, §4.9).

pub mod conditional_approval;
pub mod counter_offer;
pub mod denial;
pub mod final_approval;
pub mod fraud_detection;
pub mod interest_rate;
pub mod manual_review;
pub mod policy_compliance;
pub mod registry;
pub mod state_update;

pub use conditional_approval::ConditionalApprovalHandler;
pub use counter_offer::CounterOfferHandler;
pub use denial::ProcessDenialHandler;
pub use final_approval::FinalApprovalHandler;
pub use fraud_detection::FraudDetectionHandler;
pub use interest_rate::InterestRateHandler;
pub use manual_review::ManualReviewHandler;
pub use policy_compliance::PolicyComplianceHandler;
pub use registry::HandlerRegistry;
pub use state_update::StateUpdateHandler;
