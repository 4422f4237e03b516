//! Payment-method selection and the backend half of the card and PayPal flows.

use std::str::FromStr;

use lx_api_types::{PaymentRequest, PaypalExecuteRequest, RecordId};
use lx_client::{ApiError, Transport, calls};
use tracing::{info, warn};

pub const ORDER_CONFIRMATION_PATH: &str = "/order-confirmation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Which payment containers are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentPanels {
    pub card: bool,
    pub paypal: bool,
}

impl PaymentMethod {
    pub fn panels(self) -> PaymentPanels {
        PaymentPanels {
            card: self == PaymentMethod::CreditCard,
            paypal: self == PaymentMethod::Paypal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOrder {
    pub order_id: RecordId,
    pub amount: f64,
}

impl CheckoutOrder {
    /// From the checkout form's `data-order-id` and `data-amount`.
    pub fn from_attributes(order_id: Option<&str>, amount: Option<&str>) -> Option<Self> {
        let order_id = order_id.map(str::trim).filter(|id| !id.is_empty())?;
        let amount = amount?.trim().parse::<f64>().ok().filter(|a| a.is_finite())?;
        Some(Self {
            order_id: RecordId::new(order_id),
            amount,
        })
    }

    fn payment_request(&self) -> PaymentRequest {
        PaymentRequest {
            order_id: self.order_id.clone(),
            amount: self.amount,
        }
    }
}

/// Create a Stripe payment intent and return its client secret.
pub async fn start_card_payment(
    transport: &dyn Transport,
    order: &CheckoutOrder,
) -> Result<String, ApiError> {
    let intent = calls::create_payment_intent(transport, &order.payment_request()).await?;
    info!(order_id = %order.order_id, "payment intent created");
    Ok(intent.client_secret)
}

/// Create a PayPal payment and return the id the PayPal button expects.
pub async fn start_paypal_payment(
    transport: &dyn Transport,
    order: &CheckoutOrder,
) -> Result<String, ApiError> {
    calls::create_paypal_payment(transport, &order.payment_request()).await
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaypalOutcome {
    Completed { redirect: &'static str },
    Failed { alert: String },
}

pub async fn approve_paypal_payment(
    transport: &dyn Transport,
    payment_id: &str,
    payer_id: &str,
) -> PaypalOutcome {
    let request = PaypalExecuteRequest {
        payment_id: payment_id.to_owned(),
        payer_id: payer_id.to_owned(),
    };
    let reason = match calls::execute_paypal_payment(transport, &request).await {
        Ok(response) if response.success => {
            return PaypalOutcome::Completed {
                redirect: ORDER_CONFIRMATION_PATH,
            };
        }
        Ok(response) => response.error.unwrap_or_default(),
        Err(err) => err.user_message(),
    };
    warn!(payment_id, reason = %reason, "paypal execution failed");
    PaypalOutcome::Failed {
        alert: format!("Payment failed: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lx_api_types::HttpMethod;
    use lx_client::paths;
    use lx_client::testing::ScriptedTransport;
    use serde_json::json;

    fn order() -> CheckoutOrder {
        CheckoutOrder::from_attributes(Some("12"), Some("2499.50")).expect("valid order")
    }

    #[test]
    fn method_toggles_panels() -> anyhow::Result<()> {
        let card: PaymentMethod = "credit_card".parse::<PaymentMethod>().map_err(anyhow::Error::msg)?;
        assert_eq!(card.panels(), PaymentPanels { card: true, paypal: false });
        let paypal: PaymentMethod = "paypal".parse::<PaymentMethod>().map_err(anyhow::Error::msg)?;
        assert_eq!(paypal.panels(), PaymentPanels { card: false, paypal: true });
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        Ok(())
    }

    #[test]
    fn order_needs_id_and_amount() {
        assert!(CheckoutOrder::from_attributes(None, Some("10")).is_none());
        assert!(CheckoutOrder::from_attributes(Some("1"), Some("ten")).is_none());
        assert_eq!(order().amount, 2499.5);
    }

    #[tokio::test]
    async fn card_payment_returns_client_secret() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.respond(
            HttpMethod::Post,
            paths::CREATE_PAYMENT_INTENT,
            200,
            json!({"clientSecret": "pi_secret", "payment_id": 3}),
        );
        assert_eq!(start_card_payment(&transport, &order()).await?, "pi_secret");
        let sent = transport.requests_to(HttpMethod::Post, paths::CREATE_PAYMENT_INTENT);
        assert_eq!(sent[0].json_body(), Some(&json!({"order_id": "12", "amount": 2499.5})));
        Ok(())
    }

    #[tokio::test]
    async fn paypal_round_trip() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.respond(
            HttpMethod::Post,
            paths::CREATE_PAYPAL_PAYMENT,
            200,
            json!({"paymentID": "PAY-1"}),
        );
        transport.respond(
            HttpMethod::Post,
            paths::EXECUTE_PAYPAL_PAYMENT,
            200,
            json!({"success": true}),
        );

        let payment_id = start_paypal_payment(&transport, &order()).await?;
        assert_eq!(payment_id, "PAY-1");
        assert_eq!(
            approve_paypal_payment(&transport, &payment_id, "PAYER-9").await,
            PaypalOutcome::Completed {
                redirect: ORDER_CONFIRMATION_PATH
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn paypal_failure_is_alerted() {
        let transport = ScriptedTransport::new();
        transport.respond(
            HttpMethod::Post,
            paths::EXECUTE_PAYPAL_PAYMENT,
            200,
            json!({"success": false, "error": "Payment not approved"}),
        );
        assert_eq!(
            approve_paypal_payment(&transport, "PAY-1", "PAYER-9").await,
            PaypalOutcome::Failed {
                alert: "Payment failed: Payment not approved".into()
            }
        );
    }
}
