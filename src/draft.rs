use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::errors::{DebtError, Result};
use crate::payments::{compute_payment_plan, installment_count, PaymentPlan, PaymentPlanItem, PlanCalculator, PlanTerms};
use crate::serde_ext::iso_date;
use crate::types::PlanMethod;

/// a debt the user is still filling in; everything a record has except its id and plan
#[derive(Debug, Clone, PartialEq)]
pub struct DebtDraft {
    pub name: String,
    pub lender_name: String,
    pub principal_amount: Money,
    pub annual_interest_rate_percent: Decimal,
    pub installment_count: u32,
    pub payment_start_date: NaiveDate,
    pub description: String,
    pub amount_paid: Money,
}

impl DebtDraft {
    pub fn builder() -> DebtDraftBuilder {
        DebtDraftBuilder::new()
    }

    /// blank form starting on `start_date`
    pub fn blank(start_date: NaiveDate) -> Self {
        Self {
            name: String::new(),
            lender_name: String::new(),
            principal_amount: Money::ZERO,
            annual_interest_rate_percent: Decimal::ZERO,
            installment_count: 0,
            payment_start_date: start_date,
            description: String::new(),
            amount_paid: Money::ZERO,
        }
    }

    pub fn plan_terms(&self) -> PlanTerms {
        PlanTerms::new(
            self.principal_amount,
            Rate::from_percent(self.annual_interest_rate_percent),
            self.installment_count,
            self.payment_start_date,
        )
    }

    /// payment plan under the standard compounded-flat rule
    pub fn compute_plan(&self) -> Result<Vec<PaymentPlanItem>> {
        compute_payment_plan(
            self.principal_amount,
            self.annual_interest_rate_percent,
            self.installment_count,
            self.payment_start_date,
        )
    }

    pub fn compute_plan_with(&self, method: PlanMethod) -> Result<PaymentPlan> {
        PlanCalculator::new(method).calculate(&self.plan_terms())
    }

    /// update one field from raw form text
    ///
    /// the draft is left untouched when the text does not parse.
    pub fn apply(&mut self, field: DraftField, raw: &str) -> Result<()> {
        match field {
            DraftField::Name => self.name = raw.to_string(),
            DraftField::LenderName => self.lender_name = raw.to_string(),
            DraftField::PrincipalAmount => {
                self.principal_amount = Money::from_str_exact(raw)
                    .map_err(|_| invalid_field(field, raw, "a decimal amount"))?;
            }
            DraftField::InterestRate => {
                self.annual_interest_rate_percent = Decimal::from_str(raw.trim())
                    .map_err(|_| invalid_field(field, raw, "a decimal percentage"))?;
            }
            DraftField::InstallmentCount => {
                let count: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| invalid_field(field, raw, "a whole number"))?;
                self.installment_count = installment_count(count)?;
            }
            DraftField::PaymentStart => {
                self.payment_start_date =
                    iso_date::parse(raw).ok_or_else(|| invalid_field(field, raw, "a YYYY-MM-DD date"))?;
            }
            DraftField::Description => self.description = raw.to_string(),
        }
        Ok(())
    }

    /// check the fields a plan cannot be computed without
    pub fn validate(&self) -> Result<()> {
        self.plan_terms().validate()
    }
}

/// form fields of a debt draft, named as the service names them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    LenderName,
    PrincipalAmount,
    InterestRate,
    InstallmentCount,
    PaymentStart,
    Description,
}

impl DraftField {
    pub const ALL: [DraftField; 7] = [
        DraftField::Name,
        DraftField::LenderName,
        DraftField::PrincipalAmount,
        DraftField::InterestRate,
        DraftField::InstallmentCount,
        DraftField::PaymentStart,
        DraftField::Description,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Name => "debtName",
            DraftField::LenderName => "lenderName",
            DraftField::PrincipalAmount => "debtAmount",
            DraftField::InterestRate => "interestRate",
            DraftField::InstallmentCount => "installment",
            DraftField::PaymentStart => "paymentStart",
            DraftField::Description => "description",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = DebtError;

    fn from_str(s: &str) -> Result<Self> {
        DraftField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| DebtError::invalid_input(format!("unknown debt field {s:?}")))
    }
}

fn invalid_field(field: DraftField, raw: &str, expected: &str) -> DebtError {
    DebtError::invalid_input(format!("{field} must be {expected}, got {raw:?}"))
}

/// builder for debt drafts
#[derive(Debug, Default)]
pub struct DebtDraftBuilder {
    name: Option<String>,
    lender_name: Option<String>,
    principal_amount: Option<Money>,
    annual_interest_rate_percent: Option<Decimal>,
    installment_count: Option<u32>,
    payment_start_date: Option<NaiveDate>,
    description: Option<String>,
}

impl DebtDraftBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn lender_name(mut self, lender: impl Into<String>) -> Self {
        self.lender_name = Some(lender.into());
        self
    }

    pub fn principal_amount(mut self, amount: Money) -> Self {
        self.principal_amount = Some(amount);
        self
    }

    pub fn annual_interest_rate_percent(mut self, percent: Decimal) -> Self {
        self.annual_interest_rate_percent = Some(percent);
        self
    }

    pub fn installment_count(mut self, count: u32) -> Self {
        self.installment_count = Some(count);
        self
    }

    pub fn payment_start_date(mut self, date: NaiveDate) -> Self {
        self.payment_start_date = Some(date);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// build, defaulting the start date to today's system date
    pub fn build(self) -> Result<DebtDraft> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.build_with_time(&time)
    }

    /// build, defaulting the start date to the provider's current date
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<DebtDraft> {
        let principal_amount = self
            .principal_amount
            .ok_or_else(|| DebtError::invalid_input("principal amount required"))?;

        let installment_count = self
            .installment_count
            .ok_or_else(|| DebtError::invalid_input("installment count required"))?;

        let draft = DebtDraft {
            name: self.name.unwrap_or_default(),
            lender_name: self.lender_name.unwrap_or_default(),
            principal_amount,
            annual_interest_rate_percent: self.annual_interest_rate_percent.unwrap_or(Decimal::ZERO),
            installment_count,
            payment_start_date: self
                .payment_start_date
                .unwrap_or_else(|| time_provider.now().date_naive()),
            description: self.description.unwrap_or_default(),
            amount_paid: Money::ZERO,
        };

        draft.plan_terms().validate()?;
        Ok(draft)
    }
}
