pub mod decision;
pub mod handler;

pub use decision::{decide, CreditDecision};
pub use handler::CreditCheckHandler;
