mod hmac;

pub use hmac::HmacMiddlewareFactory;

/// Header carrying the gateway's HMAC-SHA-512 signature of the webhook body.
pub const PAYSTACK_SIGNATURE_HEADER: &str = "x-paystack-signature";
