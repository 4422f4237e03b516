//! Typed calls against the storefront backend.

use lx_api_types::{
    CartCountResponse, ContactRequest, Envelope, GiveawayEntryRequest, HttpMethod,
    PaymentIntentResponse, PaymentRequest, PaypalCreateResponse, PaypalExecuteRequest,
    PaypalExecuteResponse, SectionVisibility, Stats, SubscribeRequest,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub mod paths {
    pub const ADMIN_PRODUCTS: &str = "/api/admin/products";
    pub const ADMIN_SECTIONS: &str = "/api/admin/sections";
    pub const ADMIN_MESSAGES: &str = "/api/admin/messages";
    pub const ADMIN_RECENT_MESSAGES: &str = "/api/admin/messages?limit=5";
    pub const ADMIN_SUBSCRIBERS: &str = "/api/admin/subscribers";
    pub const ADMIN_VIDEOS: &str = "/api/admin/videos";
    pub const ADMIN_GIVEAWAY: &str = "/api/admin/giveaway";
    pub const ADMIN_STATS: &str = "/api/admin/stats";

    pub const SUBSCRIBE: &str = "/api/subscribe";
    pub const CONTACT: &str = "/api/contact";
    pub const ENTER_GIVEAWAY: &str = "/api/enter-giveaway";
    pub const CART_COUNT: &str = "/api/cart/count";

    pub const CREATE_PAYMENT_INTENT: &str = "/api/create-payment-intent";
    pub const CREATE_PAYPAL_PAYMENT: &str = "/api/create-paypal-payment";
    pub const EXECUTE_PAYPAL_PAYMENT: &str = "/api/execute-paypal-payment";
}

/// GET `path` and decode a 2xx body as `T`.
pub async fn get_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    path: &str,
) -> Result<T, ApiError> {
    let response = transport.send(ApiRequest::get(path)).await?;
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            message: response.server_message(),
        });
    }
    response.decode()
}

/// Send a mutating request and interpret the `{success, message}` envelope.
///
/// The envelope is honoured whatever the status code, since the backend
/// reports validation failures as 4xx with a message.
pub async fn mutate(transport: &dyn Transport, request: ApiRequest) -> Result<Envelope, ApiError> {
    debug!(method = request.method.as_str(), path = %request.path, "mutating request");
    let response = transport.send(request).await?;
    let status = response.status;
    let ok_status = response.is_success();

    match response.decode::<Envelope>() {
        Ok(envelope) if envelope.success => Ok(envelope),
        Ok(envelope) if !envelope.display_message().is_empty() => {
            Err(ApiError::Rejected(envelope.display_message().to_owned()))
        }
        Ok(_) if !ok_status => Err(ApiError::Status {
            status,
            message: String::new(),
        }),
        Ok(_) => Err(ApiError::Rejected(String::new())),
        Err(_) if !ok_status => Err(ApiError::Status {
            status,
            message: String::new(),
        }),
        Err(err) => Err(err),
    }
}

/// POST a JSON body and decode a 2xx response as `T`.
async fn post_for<T: DeserializeOwned, B: serde::Serialize>(
    transport: &dyn Transport,
    path: &str,
    body: &B,
) -> Result<T, ApiError> {
    let response = transport
        .send(ApiRequest::json(HttpMethod::Post, path, body)?)
        .await?;
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            message: response.server_message(),
        });
    }
    response.decode()
}

/// Authoritative cart item count; `None` when the backend omits `count`.
pub async fn fetch_cart_count(transport: &dyn Transport) -> Result<Option<u64>, ApiError> {
    let response: CartCountResponse = get_json(transport, paths::CART_COUNT).await?;
    Ok(response.count)
}

pub async fn subscribe(transport: &dyn Transport, email: &str) -> Result<Envelope, ApiError> {
    let body = SubscribeRequest {
        email: email.to_owned(),
    };
    mutate(
        transport,
        ApiRequest::json(HttpMethod::Post, paths::SUBSCRIBE, &body)?,
    )
    .await
}

pub async fn contact(
    transport: &dyn Transport,
    request: &ContactRequest,
) -> Result<Envelope, ApiError> {
    mutate(
        transport,
        ApiRequest::json(HttpMethod::Post, paths::CONTACT, request)?,
    )
    .await
}

pub async fn enter_giveaway(transport: &dyn Transport, email: &str) -> Result<Envelope, ApiError> {
    let body = GiveawayEntryRequest {
        email: email.to_owned(),
    };
    mutate(
        transport,
        ApiRequest::json(HttpMethod::Post, paths::ENTER_GIVEAWAY, &body)?,
    )
    .await
}

pub async fn fetch_stats(transport: &dyn Transport) -> Result<Stats, ApiError> {
    get_json(transport, paths::ADMIN_STATS).await
}

pub async fn save_sections(
    transport: &dyn Transport,
    sections: &[SectionVisibility],
) -> Result<Envelope, ApiError> {
    mutate(
        transport,
        ApiRequest::json(HttpMethod::Post, paths::ADMIN_SECTIONS, sections)?,
    )
    .await
}

pub async fn create_payment_intent(
    transport: &dyn Transport,
    request: &PaymentRequest,
) -> Result<PaymentIntentResponse, ApiError> {
    post_for(transport, paths::CREATE_PAYMENT_INTENT, request).await
}

/// Returns the PayPal payment id to hand to the SDK's `createOrder`.
pub async fn create_paypal_payment(
    transport: &dyn Transport,
    request: &PaymentRequest,
) -> Result<String, ApiError> {
    let response: PaypalCreateResponse =
        post_for(transport, paths::CREATE_PAYPAL_PAYMENT, request).await?;
    match response.payment_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ApiError::Rejected(response.error.unwrap_or_default())),
    }
}

pub async fn execute_paypal_payment(
    transport: &dyn Transport,
    request: &PaypalExecuteRequest,
) -> Result<PaypalExecuteResponse, ApiError> {
    let response = transport
        .send(ApiRequest::json(
            HttpMethod::Post,
            paths::EXECUTE_PAYPAL_PAYMENT,
            request,
        )?)
        .await?;
    let status = response.status;
    response.decode().map_err(|err| {
        if (200..300).contains(&status) {
            err
        } else {
            ApiError::Status {
                status,
                message: String::new(),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn mutate_accepts_success_envelope() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.respond(
            HttpMethod::Post,
            paths::SUBSCRIBE,
            200,
            json!({"success": true, "message": "Subscribed successfully!"}),
        );

        let envelope = subscribe(&transport, "a@maison.test").await?;
        assert_eq!(envelope.message, "Subscribed successfully!");

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].json_body(),
            Some(&json!({"email": "a@maison.test"}))
        );
        Ok(())
    }

    #[tokio::test]
    async fn mutate_reads_envelope_from_error_status() {
        let transport = ScriptedTransport::new();
        transport.respond(
            HttpMethod::Post,
            paths::SUBSCRIBE,
            400,
            json!({"success": false, "message": "Email is required."}),
        );

        let err = subscribe(&transport, "").await.expect_err("rejected");
        assert_eq!(err, ApiError::Rejected("Email is required.".into()));
    }

    #[tokio::test]
    async fn mutate_maps_bare_error_status() {
        let transport = ScriptedTransport::new();
        transport.respond(HttpMethod::Post, paths::CONTACT, 500, serde_json::Value::Null);

        let request = ContactRequest {
            name: "A".into(),
            email: "a@maison.test".into(),
            message: "hello".into(),
        };
        let err = contact(&transport, &request).await.expect_err("status");
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn cart_count_is_optional() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.respond(HttpMethod::Get, paths::CART_COUNT, 200, json!({"count": 5}));
        assert_eq!(fetch_cart_count(&transport).await?, Some(5));

        let transport = ScriptedTransport::new();
        transport.respond(HttpMethod::Get, paths::CART_COUNT, 200, json!({}));
        assert_eq!(fetch_cart_count(&transport).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn paypal_create_requires_payment_id() {
        let transport = ScriptedTransport::new();
        transport.respond(
            HttpMethod::Post,
            paths::CREATE_PAYPAL_PAYMENT,
            200,
            json!({"error": "Failed to create PayPal order"}),
        );
        let request = PaymentRequest {
            order_id: "12".into(),
            amount: 480.0,
        };
        let err = create_paypal_payment(&transport, &request)
            .await
            .expect_err("missing id");
        assert_eq!(err.user_message(), "Failed to create PayPal order");
    }
}
