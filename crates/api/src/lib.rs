//! `carbonharvest-api` — HTTP surface over the carbon-credit ledger.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
