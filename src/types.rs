use serde::{Deserialize, Serialize};

/// identifier assigned to a debt by the remote service
pub type DebtId = String;

/// how a payment plan spreads principal and interest over its installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanMethod {
    /// compound the whole principal over the term, then split the total evenly
    #[default]
    CompoundedFlat,
    /// standard annuity: equal payments against a declining balance
    EqualInstallments,
}

/// profile returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}
