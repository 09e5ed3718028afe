use rust_decimal::{Decimal, MathematicalOps};

use crate::decimal::{Money, Rate};
use crate::errors::{DebtError, Result};
use crate::payments::calendar::add_months;
use crate::payments::{PaymentPlan, PaymentPlanItem, PlanTerms};
use crate::types::PlanMethod;

/// payment plan calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanCalculator {
    method: PlanMethod,
}

impl PlanCalculator {
    pub fn new(method: PlanMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> PlanMethod {
        self.method
    }

    /// calculate the full plan, one item per installment in date order
    pub fn calculate(&self, terms: &PlanTerms) -> Result<PaymentPlan> {
        terms.validate()?;

        let payment = match self.method {
            PlanMethod::CompoundedFlat => {
                compounded_flat_payment(terms.principal, terms.annual_rate, terms.installments)?
            }
            PlanMethod::EqualInstallments => {
                equal_installment_payment(terms.principal, terms.annual_rate, terms.installments)?
            }
        };

        let items = (1..=terms.installments)
            .map(|month| {
                Ok(PaymentPlanItem {
                    payment_date: add_months(terms.start_date, month)?,
                    payment_amount: payment,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PaymentPlan {
            method: self.method,
            principal: terms.principal,
            items,
        })
    }
}

/// total = P * (1 + r)^n, paid back in n equal slices
///
/// all compounding happens up front, so this is not a declining-balance
/// schedule. it is the rule debts have always been recorded with.
fn compounded_flat_payment(principal: Money, annual_rate: Rate, installments: u32) -> Result<Money> {
    let n = Decimal::from(installments);
    let monthly_rate = annual_rate.monthly_rate().as_decimal();

    if monthly_rate.is_zero() {
        return Ok(principal / n);
    }

    let factor = compound_factor(monthly_rate, installments)?;
    let total_owed = principal
        .as_decimal()
        .checked_mul(factor)
        .ok_or_else(|| overflow(principal, annual_rate, installments))?;

    Ok(Money::from_decimal(total_owed / n))
}

/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1)
fn equal_installment_payment(principal: Money, annual_rate: Rate, installments: u32) -> Result<Money> {
    let n = Decimal::from(installments);
    let r = annual_rate.monthly_rate().as_decimal();

    if r.is_zero() {
        return Ok(principal / n);
    }

    let factor = compound_factor(r, installments)?;
    let numerator = principal
        .as_decimal()
        .checked_mul(r)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| overflow(principal, annual_rate, installments))?;

    match numerator.checked_div(factor - Decimal::ONE) {
        Some(emi) => Ok(Money::from_decimal(emi)),
        None => Ok(principal / n),
    }
}

/// (1 + r)^n, failing instead of panicking on overflow
fn compound_factor(rate: Decimal, periods: u32) -> Result<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(periods))
        .ok_or_else(|| {
            DebtError::invalid_input(format!(
                "compounding {rate} over {periods} periods exceeds the representable range"
            ))
        })
}

fn overflow(principal: Money, annual_rate: Rate, installments: u32) -> DebtError {
    DebtError::invalid_input(format!(
        "plan for {principal} at {annual_rate} over {installments} installments exceeds the representable range"
    ))
}
