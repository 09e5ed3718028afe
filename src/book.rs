use crate::debt::DebtRecord;
use crate::draft::DebtDraft;
use crate::errors::Result;
use crate::remote::DebtGateway;

/// the locally held list of debts, kept in step with the service
///
/// failed operations leave the list exactly as it was.
pub struct DebtBook {
    gateway: DebtGateway,
    debts: Vec<DebtRecord>,
}

impl DebtBook {
    pub fn new(gateway: DebtGateway) -> Self {
        Self {
            gateway,
            debts: Vec::new(),
        }
    }

    pub fn debts(&self) -> &[DebtRecord] {
        &self.debts
    }

    /// replace the list with what the service currently holds
    pub async fn refresh(&mut self) -> Result<&[DebtRecord]> {
        let debts = self.gateway.list_debts().await?;
        self.debts = debts;
        Ok(&self.debts)
    }

    /// compute the plan, submit the debt and keep the service's copy
    pub async fn create(&mut self, draft: DebtDraft) -> Result<DebtRecord> {
        draft.validate()?;
        let plan = draft.compute_plan()?;
        let created = self.gateway.create_debt(draft, plan).await?;
        self.debts.push(created.clone());
        Ok(created)
    }

    pub fn find(&self, id: &str) -> Option<&DebtRecord> {
        self.debts.iter().find(|debt| debt.id.as_deref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::errors::DebtError;
    use crate::remote::fake::FakeTransport;
    use crate::session::{MemoryTokenStore, SessionToken};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn open_book(transport: FakeTransport) -> (DebtBook, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        let tokens = Arc::new(MemoryTokenStore::with_token(SessionToken::new("jwt").unwrap()));
        (DebtBook::new(DebtGateway::new(transport.clone(), tokens)), transport)
    }

    fn draft(installments: u32) -> DebtDraft {
        DebtDraft::builder()
            .name("Loan")
            .lender_name("Friend")
            .principal_amount(Money::from_major(600))
            .annual_interest_rate_percent(dec!(0))
            .installment_count(installments)
            .payment_start_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
            .build()
            .unwrap()
    }

    fn listed(id: &str) -> serde_json::Value {
        json!({"debtId": id, "debtName": "Old", "lenderName": "L", "debtAmount": 100,
               "interestRate": 0, "amount": 0, "paymentStart": "2024-01-01", "installment": 1,
               "description": "", "paymentPlan": [{"paymentDate": "2024-02-01", "paymentAmount": 100}]})
    }

    #[tokio::test]
    async fn test_create_appends_service_copy() {
        let (mut book, transport) = open_book(
            FakeTransport::new()
                .reply(200, json!({"status": "success", "data": [listed("old-1")]}))
                .reply(201, json!({"status": "success", "data": {
                    "debtId": "new-1", "debtName": "Loan", "lenderName": "Friend", "debtAmount": 600,
                    "interestRate": 0, "amount": 0, "paymentStart": "2024-01-31", "installment": 2,
                    "description": "",
                    "paymentPlan": [
                        {"paymentDate": "2024-02-29", "paymentAmount": 300},
                        {"paymentDate": "2024-03-31", "paymentAmount": 300}
                    ]
                }})),
        );

        book.refresh().await.unwrap();
        let created = book.create(draft(2)).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("new-1"));

        assert_eq!(book.debts().len(), 2);
        assert_eq!(book.debts().last(), Some(&created));
        assert!(book.find("old-1").is_some());
        assert!(book.find("new-1").is_some());

        // the submitted plan was computed locally from the draft
        let sent = transport.requests();
        let plan = &sent[1].body.as_ref().unwrap()["paymentPlan"];
        assert_eq!(plan[0]["paymentDate"], "2024-02-29");
        assert_eq!(plan[1]["paymentDate"], "2024-03-31");
    }

    #[tokio::test]
    async fn test_failed_create_leaves_list_unchanged() {
        let (mut book, _) = open_book(
            FakeTransport::new()
                .reply(200, json!({"status": "success", "data": [listed("old-1")]}))
                .reply(500, json!({"status": "error", "data": "Database unavailable"})),
        );

        book.refresh().await.unwrap();
        let before = book.debts().to_vec();

        let err = book.create(draft(2)).await.unwrap_err();
        assert!(matches!(err, DebtError::RemoteOperationFailed { ref message } if message == "Database unavailable"));
        assert_eq!(book.debts(), before.as_slice());
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_service() {
        let (mut book, transport) = open_book(FakeTransport::new());
        let mut bad = draft(2);
        bad.installment_count = 0;

        let err = book.create(bad).await.unwrap_err();
        assert!(matches!(err, DebtError::InvalidInput { .. }));
        assert!(transport.requests().is_empty());
        assert!(book.debts().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let (mut book, _) = open_book(
            FakeTransport::new()
                .reply(200, json!({"status": "success", "data": [listed("a"), listed("b")]}))
                .network_error("timed out"),
        );

        book.refresh().await.unwrap();
        assert!(book.refresh().await.is_err());
        assert_eq!(book.debts().len(), 2);
    }
}
