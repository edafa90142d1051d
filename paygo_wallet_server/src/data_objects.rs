use std::fmt::Display;

use pwg_common::Kobo;
use serde::{Deserialize, Serialize};

/// Body of `POST /wallet/fund/paystack`. Amount in kobo.
#[derive(Debug, Clone, Deserialize)]
pub struct FundWalletRequest {
    pub amount: Kobo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
