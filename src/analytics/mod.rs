//! Derived portfolio metrics. No I/O: every function here works on an
//! already-fetched snapshot of projects.

pub mod stats;
pub mod tax_credit;
pub mod timeline;

pub use stats::{DashboardStats, StageBudget, aggregate, budget_by_stage, total_tax_credit};
pub use tax_credit::tax_credit;
pub use timeline::summarize;
