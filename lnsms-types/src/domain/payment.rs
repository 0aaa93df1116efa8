//! Payment record domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::claim::ClaimCode;

/// Provider-assigned payment identifier, the ledger's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PaymentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PaymentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Direction of value flow as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDirection {
    /// Inbound value transfer recognized as received funds.
    Credit,
    /// Outbound value transfer.
    Debit,
}

/// Provider-reported lifecycle state of a payment.
///
/// Providers occasionally introduce new states; values we do not know are
/// round-tripped verbatim through the `Other` variant rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
    Unpaid,
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "PAID"),
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Failed => write!(f, "FAILED"),
            PaymentStatus::Unpaid => write!(f, "UNPAID"),
            PaymentStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// One payment as reported by the wallet provider.
///
/// Only the fields the relay consumes are typed; everything else the
/// provider sends (time, fees, currency, transactionId, ...) is captured in
/// `extra` and written back out unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPayment {
    pub id: PaymentId,
    #[serde(rename = "type")]
    pub direction: PaymentDirection,
    pub status: PaymentStatus,
    /// Exact base-currency (BTC) amount, serialized as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of a payout attempt for a claimed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutOutcome {
    /// The provider accepted the payout (or reported a non-terminal state).
    Settled,
    /// The payout call failed in transit; settlement is unknown and the
    /// claim is held for manual review.
    Indeterminate,
}

/// One ledger record per provider payment identifier.
///
/// The provider is the source of truth for every field of `payment`; the
/// underscore-prefixed flags are internal relay state and survive provider
/// merges. Field names match the on-disk ledger format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(flatten)]
    pub payment: ProviderPayment,
    /// True once a notification has been dispatched for this record.
    /// Transitions false -> true exactly once.
    #[serde(rename = "_sentSMS", default)]
    pub sent_sms: bool,
    /// One-time secret required to redeem the payment. Present exactly when
    /// `sent_sms` is true; never changes once assigned.
    #[serde(rename = "_claimCode", default, skip_serializing_if = "Option::is_none")]
    pub claim_code: Option<ClaimCode>,
    /// True once a redemption attempt has begun or completed.
    #[serde(rename = "_claimed", default)]
    pub claimed: bool,
    /// Recorded payout outcome of the redemption, if one was attempted.
    #[serde(rename = "_payout", default, skip_serializing_if = "Option::is_none")]
    pub payout: Option<PayoutOutcome>,
}

impl PaymentRecord {
    /// A freshly observed payment with blank internal state.
    pub fn new(payment: ProviderPayment) -> Self {
        Self {
            payment,
            sent_sms: false,
            claim_code: None,
            claimed: false,
            payout: None,
        }
    }

    pub fn id(&self) -> &PaymentId {
        &self.payment.id
    }

    /// Merges a provider update into this record. Provider fields win;
    /// stored pass-through fields absent from the update are kept; the
    /// internal flags are untouched.
    pub fn merge_provider(&mut self, update: ProviderPayment) {
        let ProviderPayment {
            id,
            direction,
            status,
            amount,
            description,
            extra,
        } = update;
        self.payment.id = id;
        self.payment.direction = direction;
        self.payment.status = status;
        self.payment.amount = amount;
        self.payment.description = description;
        for (key, value) in extra {
            self.payment.extra.insert(key, value);
        }
    }

    /// The amount payable to the recipient after the fixed network fee.
    pub fn payable_amount(&self, fixed_fee: Decimal) -> Decimal {
        self.payment.amount - fixed_fee
    }

    /// True for a settled inbound payment that has not been notified yet.
    pub fn needs_notification(&self) -> bool {
        self.payment.direction == PaymentDirection::Credit
            && self.payment.status == PaymentStatus::Paid
            && !self.sent_sms
    }

    /// Destination phone number embedded in the payment description as a
    /// bracketed token, e.g. `"pay [+15551234567]"`.
    pub fn destination_number(&self) -> Option<&str> {
        bracket_token(&self.payment.description)
    }
}

/// Extracts the first non-empty `[...]` token from a description.
fn bracket_token(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let rest = &text[start + 1..];
    let end = rest.find(']')?;
    let token = &rest[..end];
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(id: &str, amount: &str, description: &str) -> ProviderPayment {
        ProviderPayment {
            id: PaymentId::from(id),
            direction: PaymentDirection::Credit,
            status: PaymentStatus::Paid,
            amount: amount.parse().unwrap(),
            description: description.to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_bracket_token_extraction() {
        assert_eq!(bracket_token("pay [+15551234567]"), Some("+15551234567"));
        assert_eq!(bracket_token("[a] and [b]"), Some("a"));
        assert_eq!(bracket_token("no token here"), None);
        assert_eq!(bracket_token("empty []"), None);
        assert_eq!(bracket_token("unterminated ["), None);
    }

    #[test]
    fn test_payable_amount_is_exact() {
        let record = PaymentRecord::new(credit("p1", "0.0011", "pay [+15551234567]"));
        let fee: Decimal = "0.00001".parse().unwrap();
        assert_eq!(record.payable_amount(fee).to_string(), "0.00109");
    }

    #[test]
    fn test_needs_notification() {
        let mut record = PaymentRecord::new(credit("p1", "0.0011", ""));
        assert!(record.needs_notification());

        record.sent_sms = true;
        assert!(!record.needs_notification());

        let mut debit = PaymentRecord::new(credit("p2", "0.0011", ""));
        debit.payment.direction = PaymentDirection::Debit;
        assert!(!debit.needs_notification());

        let mut pending = PaymentRecord::new(credit("p3", "0.0011", ""));
        pending.payment.status = PaymentStatus::Pending;
        assert!(!pending.needs_notification());
    }

    #[test]
    fn test_merge_provider_preserves_flags_and_extras() {
        let mut first = credit("p1", "0.0011", "pay [+15551234567]");
        first
            .extra
            .insert("fees".into(), Value::String("0.0000005".into()));

        let mut record = PaymentRecord::new(first);
        record.sent_sms = true;
        record.claim_code = Some(ClaimCode::from("abc123"));

        let mut update = credit("p1", "0.0011", "pay [+15551234567]");
        update
            .extra
            .insert("transactionId".into(), Value::String("tx9".into()));
        record.merge_provider(update);

        assert!(record.sent_sms);
        assert_eq!(record.claim_code.as_ref().unwrap().as_str(), "abc123");
        assert_eq!(record.payment.extra["fees"], "0.0000005");
        assert_eq!(record.payment.extra["transactionId"], "tx9");
    }

    #[test]
    fn test_record_serde_uses_ledger_field_names() {
        let mut record = PaymentRecord::new(credit("p1", "0.0011", "pay [+1555]"));
        record.sent_sms = true;
        record.claim_code = Some(ClaimCode::from("codeword"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["_sentSMS"], true);
        assert_eq!(json["_claimCode"], "codeword");
        assert_eq!(json["_claimed"], false);
        assert_eq!(json["type"], "CREDIT");
        assert_eq!(json["amount"], "0.0011");

        let back: PaymentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_unknown_status_round_trips() {
        let json = serde_json::json!({
            "id": "p1",
            "type": "CREDIT",
            "status": "HELD_FOR_REVIEW",
            "amount": "0.5",
        });
        let payment: ProviderPayment = serde_json::from_value(json).unwrap();
        assert_eq!(
            payment.status,
            PaymentStatus::Other("HELD_FOR_REVIEW".to_string())
        );
        let out = serde_json::to_value(&payment).unwrap();
        assert_eq!(out["status"], "HELD_FOR_REVIEW");
    }

    #[test]
    fn test_provider_extras_pass_through() {
        let json = serde_json::json!({
            "id": "p1",
            "type": "CREDIT",
            "status": "PAID",
            "amount": "0.0011",
            "description": "pay [+1555]",
            "currency": "BTC",
            "audEstimate": "123.45",
        });
        let payment: ProviderPayment = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(payment.extra["currency"], "BTC");

        let out = serde_json::to_value(&payment).unwrap();
        assert_eq!(out, json);
    }
}
