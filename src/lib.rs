pub mod book;
pub mod config;
pub mod debt;
pub mod decimal;
pub mod draft;
pub mod errors;
pub mod payments;
pub mod remote;
pub mod serde_ext;
pub mod session;
pub mod types;

// re-export key types
pub use book::DebtBook;
pub use config::ClientConfig;
pub use debt::DebtRecord;
pub use decimal::{Money, Rate};
pub use draft::{DebtDraft, DebtDraftBuilder, DraftField};
pub use errors::{DebtError, Result};
pub use payments::{
    add_months, compute_payment_plan, compute_payment_plan_checked, PaymentPlan, PaymentPlanItem,
    PlanCalculator, PlanTerms,
};
pub use remote::{AuthGateway, AuthSession, DebtGateway, HttpTransport, ReqwestTransport};
pub use session::{FileTokenStore, MemoryTokenStore, SessionToken, TokenStore};
pub use types::{DebtId, PlanMethod, UserProfile};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
