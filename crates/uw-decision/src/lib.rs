pub mod financials;
pub mod handler;
pub mod policy;
pub mod rate;

pub use handler::UnderwritingDecisionHandler;
pub use rate::{counter_offer, matrix_rate, offer_expiration, CounterOffer};
