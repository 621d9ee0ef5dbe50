use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use sha2::Sha256;
use sqlx::PgPool;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};
use crate::models::payment::PaymentOrder;
use crate::utils::token::generate_receipt_id;

type HmacSha256 = Hmac<Sha256>;

/// Thin client over the payment gateway: create an order, fetch order or
/// payment state, and verify the callback signature. The gateway signs
/// `orderId|paymentId` with the shared key secret; verification recomputes
/// that HMAC and compares in constant time.
#[derive(Clone)]
pub struct PaymentService {
    pool: PgPool,
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct GatewayOrder {
    id: String,
}

pub fn verify_payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<()> {
    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
        .map_err(|_| Error::Internal("Payment key secret is empty".to_string()))?;
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if ConstantTimeEq::ct_eq(expected.as_bytes(), signature.as_bytes()).into() {
        Ok(())
    } else {
        Err(Error::SignatureMismatch)
    }
}

impl PaymentService {
    pub fn new(
        pool: PgPool,
        client: Client,
        base_url: String,
        key_id: String,
        key_secret: String,
        currency: String,
    ) -> Self {
        Self {
            pool,
            client,
            base_url,
            key_id,
            key_secret,
            currency,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub async fn create_order(
        &self,
        registration_number: &str,
        amount: i32,
    ) -> Result<PaymentOrder> {
        let receipt = generate_receipt_id(16);
        let body = json!({
            "amount": amount,
            "currency": self.currency,
            "receipt": receipt,
        });

        let resp = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            tracing::error!(%status, detail = %detail, "Gateway rejected order creation");
            return Err(Error::Internal(format!(
                "Payment gateway rejected order creation ({})",
                status
            )));
        }
        let gateway_order: GatewayOrder = resp.json().await?;

        let order = sqlx::query_as::<_, PaymentOrder>(
            r#"INSERT INTO payment_orders
                   (order_id, registration_number, amount, currency, receipt, status)
               VALUES ($1, $2, $3, $4, $5, 'created')
               RETURNING order_id, registration_number, amount, currency, receipt,
                         status, verified_at, created_at"#,
        )
        .bind(&gateway_order.id)
        .bind(registration_number)
        .bind(amount)
        .bind(&self.currency)
        .bind(&receipt)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(order_id = %order.order_id, amount, "Payment order created");
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: &str) -> Result<JsonValue> {
        let resp = self
            .client
            .get(format!("{}/orders/{}", self.base_url, order_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn fetch_payment(&self, payment_id: &str) -> Result<JsonValue> {
        let resp = self
            .client
            .get(format!("{}/payments/{}", self.base_url, payment_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;
        Ok(resp.json().await?)
    }

    /// Verify the gateway callback and mark the order paid. The stored
    /// order must exist; a mismatched signature leaves it untouched.
    pub async fn confirm_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<PaymentOrder> {
        verify_payment_signature(&self.key_secret, order_id, payment_id, signature)?;

        let order = sqlx::query_as::<_, PaymentOrder>(
            r#"UPDATE payment_orders
               SET status = 'paid', verified_at = $2
               WHERE order_id = $1
               RETURNING order_id, registration_number, amount, currency, receipt,
                         status, verified_at, created_at"#,
        )
        .bind(order_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Payment order '{}' does not exist", order_id)))?;

        tracing::info!(order_id = %order.order_id, payment_id, "Payment verified");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_matching_signature() {
        let sig = sign("shhh", "order_1", "pay_1");
        assert!(verify_payment_signature("shhh", "order_1", "pay_1", &sig).is_ok());
    }

    #[test]
    fn rejects_tampered_fields() {
        let sig = sign("shhh", "order_1", "pay_1");
        assert!(matches!(
            verify_payment_signature("shhh", "order_2", "pay_1", &sig),
            Err(Error::SignatureMismatch)
        ));
        assert!(matches!(
            verify_payment_signature("shhh", "order_1", "pay_2", &sig),
            Err(Error::SignatureMismatch)
        ));
        assert!(matches!(
            verify_payment_signature("wrong-secret", "order_1", "pay_1", &sig),
            Err(Error::SignatureMismatch)
        ));
    }

    #[test]
    fn rejects_truncated_signature() {
        let sig = sign("shhh", "order_1", "pay_1");
        assert!(matches!(
            verify_payment_signature("shhh", "order_1", "pay_1", &sig[..sig.len() - 2]),
            Err(Error::SignatureMismatch)
        ));
    }
}
