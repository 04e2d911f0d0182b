mod handler;
mod model;

pub use handler::{list_financials, upsert_financial};
pub use model::UpsertFinancialRequest;
