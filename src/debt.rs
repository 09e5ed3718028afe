use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decimal::{Money, Rate};
use crate::draft::DebtDraft;
use crate::payments::{PaymentPlanItem, PlanTerms};
use crate::types::DebtId;

/// a debt as stored by the remote service
///
/// field names on the wire follow the service (`debtName`, `paymentStart`, ...).
/// `id` stays `None` until the service has assigned one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireDebtRecord")]
pub struct DebtRecord {
    #[serde(rename = "debtId", skip_serializing_if = "Option::is_none")]
    pub id: Option<DebtId>,

    #[serde(rename = "debtName")]
    pub name: String,

    pub lender_name: String,

    #[serde(rename = "debtAmount")]
    pub principal_amount: Money,

    #[serde(rename = "interestRate", serialize_with = "crate::serde_ext::decimal_number::serialize")]
    pub annual_interest_rate_percent: Decimal,

    /// amount repaid so far; zero for a freshly created debt
    #[serde(rename = "amount")]
    pub amount_paid: Money,

    #[serde(rename = "installment")]
    pub installment_count: u32,

    #[serde(rename = "paymentStart", serialize_with = "crate::serde_ext::iso_date::serialize")]
    pub payment_start_date: NaiveDate,

    pub description: String,

    pub payment_plan: Vec<PaymentPlanItem>,
}

/// inbound shape; the service may send `debtId`, `_id` and `id` side by side
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDebtRecord {
    #[serde(default)]
    debt_id: Option<Value>,
    #[serde(rename = "_id", default)]
    mongo_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,

    #[serde(rename = "debtName", deserialize_with = "crate::serde_ext::lenient_string::deserialize", default)]
    name: String,

    #[serde(deserialize_with = "crate::serde_ext::lenient_string::deserialize", default)]
    lender_name: String,

    #[serde(rename = "debtAmount")]
    principal_amount: Money,

    #[serde(rename = "interestRate", deserialize_with = "crate::serde_ext::decimal_number::deserialize")]
    annual_interest_rate_percent: Decimal,

    #[serde(rename = "amount", default)]
    amount_paid: Money,

    #[serde(rename = "installment")]
    installment_count: u32,

    #[serde(rename = "paymentStart", deserialize_with = "crate::serde_ext::iso_date::deserialize")]
    payment_start_date: NaiveDate,

    #[serde(deserialize_with = "crate::serde_ext::lenient_string::deserialize", default)]
    description: String,

    #[serde(default)]
    payment_plan: Vec<PaymentPlanItem>,
}

impl From<WireDebtRecord> for DebtRecord {
    fn from(wire: WireDebtRecord) -> Self {
        // debtId wins, then _id, then id
        let id = [wire.debt_id, wire.mongo_id, wire.id]
            .into_iter()
            .flatten()
            .find_map(|value| id_text(&value));

        Self {
            id,
            name: wire.name,
            lender_name: wire.lender_name,
            principal_amount: wire.principal_amount,
            annual_interest_rate_percent: wire.annual_interest_rate_percent,
            amount_paid: wire.amount_paid,
            installment_count: wire.installment_count,
            payment_start_date: wire.payment_start_date,
            description: wire.description,
            payment_plan: wire.payment_plan,
        }
    }
}

/// string or numeric ids; anything else (null, objects) is ignored
fn id_text(value: &Value) -> Option<DebtId> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl DebtRecord {
    /// record ready to submit: draft fields plus their plan, no id yet
    pub fn from_draft(draft: DebtDraft, payment_plan: Vec<PaymentPlanItem>) -> Self {
        Self {
            id: None,
            name: draft.name,
            lender_name: draft.lender_name,
            principal_amount: draft.principal_amount,
            annual_interest_rate_percent: draft.annual_interest_rate_percent,
            amount_paid: draft.amount_paid,
            installment_count: draft.installment_count,
            payment_start_date: draft.payment_start_date,
            description: draft.description,
            payment_plan,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }

    pub fn annual_rate(&self) -> Rate {
        Rate::from_percent(self.annual_interest_rate_percent)
    }

    pub fn plan_terms(&self) -> PlanTerms {
        PlanTerms::new(
            self.principal_amount,
            self.annual_rate(),
            self.installment_count,
            self.payment_start_date,
        )
    }

    /// sum of all scheduled payments
    pub fn total_scheduled(&self) -> Money {
        self.payment_plan.iter().map(|item| item.payment_amount).sum()
    }

    /// scheduled amount still outstanding after what has been repaid
    pub fn remaining_balance(&self) -> Money {
        (self.total_scheduled() - self.amount_paid).max(Money::ZERO)
    }

    /// first scheduled payment on or after `date`
    pub fn next_payment_on_or_after(&self, date: NaiveDate) -> Option<&PaymentPlanItem> {
        self.payment_plan.iter().find(|item| item.payment_date >= date)
    }
}
