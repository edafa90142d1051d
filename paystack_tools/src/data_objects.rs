use chrono::{DateTime, Utc};
use pwg_common::Kobo;
use serde::{Deserialize, Serialize};

/// Every Paystack response wraps its payload in this envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PaystackEnvelope<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Metadata attached to a funding transaction at initialization time and echoed back by Paystack on both the
/// verify response and the webhook event. This is how a settlement is tied back to a wallet owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingMetadata {
    pub user_id: i64,
    pub amount: Kobo,
}

/// Request body for `POST /transaction/initialize`. Amount is in kobo.
#[derive(Debug, Clone, Serialize)]
pub struct InitializeBody {
    pub email: String,
    pub amount: Kobo,
    pub reference: String,
    pub callback_url: String,
    pub metadata: FundingMetadata,
}

/// The redirect handle returned by a successful initialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Authorization {
    pub authorization_url: String,
    #[serde(default)]
    pub access_code: String,
    pub reference: String,
}

/// Settlement state for a reference, as reported by `GET /transaction/verify/{reference}`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedPayment {
    pub status: String,
    pub reference: String,
    pub amount: Kobo,
    pub metadata: Option<FundingMetadata>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl VerifiedPayment {
    pub fn is_successful(&self) -> bool {
        self.status == crate::PAYMENT_SUCCESS_STATUS
    }
}

/// A webhook event as posted by Paystack. Only charge events carry the fields we care about; other event types
/// deserialize with an empty data section and are ignored upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeEvent {
    pub event: String,
    pub data: ChargeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChargeEventData {
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub amount: Kobo,
    pub metadata: Option<FundingMetadata>,
}

impl ChargeEvent {
    pub fn is_successful_charge(&self) -> bool {
        self.event == crate::CHARGE_SUCCESS_EVENT
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn charge_event_deserializes() {
        let json = r#"{
            "event": "charge.success",
            "data": {
                "reference": "PAYGO_1_1700000000000_42",
                "amount": 500000,
                "metadata": { "userId": 1, "amount": 500000 }
            }
        }"#;
        let event: ChargeEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_successful_charge());
        assert_eq!(event.data.reference, "PAYGO_1_1700000000000_42");
        assert_eq!(event.data.amount, Kobo::from(500_000));
        assert_eq!(event.data.metadata.unwrap().user_id, 1);
    }

    #[test]
    fn unrelated_events_deserialize_without_charge_fields() {
        let json = r#"{ "event": "transfer.success", "data": {} }"#;
        let event: ChargeEvent = serde_json::from_str(json).unwrap();
        assert!(!event.is_successful_charge());
        assert!(event.data.reference.is_empty());
    }

    #[test]
    fn verified_payment_status() {
        let json = r#"{
            "status": "success",
            "reference": "PAYGO_7_1700000000000_9",
            "amount": 10000,
            "metadata": { "userId": 7, "amount": 10000 },
            "paid_at": "2024-06-01T12:00:00Z"
        }"#;
        let payment: VerifiedPayment = serde_json::from_str(json).unwrap();
        assert!(payment.is_successful());
        let failed = VerifiedPayment { status: "failed".into(), ..payment };
        assert!(!failed.is_successful());
    }
}
