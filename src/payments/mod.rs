pub mod calendar;
pub mod plan;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{DebtError, Result};
use crate::types::PlanMethod;

pub use calendar::add_months;
pub use plan::PlanCalculator;

/// one scheduled monthly payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlanItem {
    #[serde(with = "crate::serde_ext::iso_date")]
    pub payment_date: NaiveDate,
    pub payment_amount: Money,
}

/// inputs to a payment plan
#[derive(Debug, Clone, PartialEq)]
pub struct PlanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub installments: u32,
    /// first payment falls one month after this date
    pub start_date: NaiveDate,
}

impl PlanTerms {
    pub fn new(principal: Money, annual_rate: Rate, installments: u32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            annual_rate,
            installments,
            start_date,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.installments == 0 {
            return Err(DebtError::invalid_input("installment count must be at least 1"));
        }
        if !self.principal.is_positive() {
            return Err(DebtError::invalid_input(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.annual_rate.is_negative() {
            return Err(DebtError::invalid_input(format!(
                "annual interest rate cannot be negative, got {}",
                self.annual_rate
            )));
        }
        // the last payment date must exist before any arithmetic is attempted
        add_months(self.start_date, self.installments)?;
        Ok(())
    }
}

/// computed payment plan
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPlan {
    pub method: PlanMethod,
    pub principal: Money,
    pub items: Vec<PaymentPlanItem>,
}

impl PaymentPlan {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// amount of the first installment
    pub fn monthly_payment(&self) -> Option<Money> {
        self.items.first().map(|item| item.payment_amount)
    }

    pub fn total_payment(&self) -> Money {
        self.items.iter().map(|item| item.payment_amount).sum()
    }

    /// everything paid on top of the principal
    pub fn total_interest(&self) -> Money {
        (self.total_payment() - self.principal).max(Money::ZERO)
    }

    pub fn into_items(self) -> Vec<PaymentPlanItem> {
        self.items
    }
}

/// compute the monthly payment plan for a debt
///
/// `annual_rate_percent` is the figure a user types (12 for 12%). payments
/// start one month after `start_date`.
pub fn compute_payment_plan(
    principal: Money,
    annual_rate_percent: Decimal,
    installments: u32,
    start_date: NaiveDate,
) -> Result<Vec<PaymentPlanItem>> {
    let terms = PlanTerms::new(
        principal,
        Rate::from_percent(annual_rate_percent),
        installments,
        start_date,
    );
    PlanCalculator::new(PlanMethod::CompoundedFlat)
        .calculate(&terms)
        .map(PaymentPlan::into_items)
}

/// same as [`compute_payment_plan`] for installment counts that arrive signed
pub fn compute_payment_plan_checked(
    principal: Money,
    annual_rate_percent: Decimal,
    installments: i64,
    start_date: NaiveDate,
) -> Result<Vec<PaymentPlanItem>> {
    let installments = installment_count(installments)?;
    compute_payment_plan(principal, annual_rate_percent, installments, start_date)
}

/// validate a raw installment count
pub fn installment_count(raw: i64) -> Result<u32> {
    if raw <= 0 {
        return Err(DebtError::invalid_input(format!(
            "installment count must be at least 1, got {raw}"
        )));
    }
    u32::try_from(raw)
        .map_err(|_| DebtError::invalid_input(format!("installment count {raw} is too large")))
}
