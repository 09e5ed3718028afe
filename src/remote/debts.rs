use std::sync::Arc;

use crate::debt::DebtRecord;
use crate::draft::DebtDraft;
use crate::errors::{DebtError, Result};
use crate::payments::PaymentPlanItem;
use crate::remote::envelope::parse_reply;
use crate::remote::{ApiRequest, HttpTransport, DEBTS_PATH};
use crate::session::{SessionToken, TokenStore};

/// debt storage on the remote service
///
/// holds nothing but its transport and token store; the service's answer is
/// always returned as-is.
pub struct DebtGateway {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenStore>,
}

impl DebtGateway {
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    /// submit a draft together with its plan; returns the service's record
    pub async fn create_debt(&self, draft: DebtDraft, plan: Vec<PaymentPlanItem>) -> Result<DebtRecord> {
        if plan.len() != draft.installment_count as usize {
            return Err(DebtError::invalid_input(format!(
                "payment plan has {} items but the debt has {} installments",
                plan.len(),
                draft.installment_count
            )));
        }
        let token = self.session_token()?;

        let record = DebtRecord::from_draft(draft, plan);
        let body = serde_json::to_value(&record)
            .map_err(|e| DebtError::invalid_input(format!("cannot encode debt: {e}")))?;

        let request = ApiRequest::post(DEBTS_PATH, body).authorized(token);
        let reply = self.transport.send(request).await?;
        let created: DebtRecord = parse_reply(&reply)?.into_data()?;

        if !created.is_persisted() {
            return Err(DebtError::malformed("created debt came back without an id"));
        }
        log::info!(
            "created debt {} with {} installments",
            created.id.as_deref().unwrap_or_default(),
            created.payment_plan.len()
        );
        Ok(created)
    }

    /// every debt visible to the current session, in service order
    pub async fn list_debts(&self) -> Result<Vec<DebtRecord>> {
        let token = self.session_token()?;

        let reply = self
            .transport
            .send(ApiRequest::get(DEBTS_PATH).authorized(token))
            .await?;
        let debts: Vec<DebtRecord> = parse_reply(&reply)?.into_data()?;

        log::debug!("fetched {} debts", debts.len());
        Ok(debts)
    }

    fn session_token(&self) -> Result<SessionToken> {
        self.tokens.get_token().ok_or_else(|| {
            log::warn!("debt request attempted without a session token");
            DebtError::AuthenticationRequired
        })
    }
}
