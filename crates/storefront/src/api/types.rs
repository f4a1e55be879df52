//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use francine_core::Price;

use crate::models::{LineItem, SessionUser};

/// Body of `POST /api/order/guestCheckout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestOrder {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub total: Price,
    pub items: Vec<LineItem>,
}

/// Reply to a guest checkout.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /api/auth/login`.
///
/// Deliberately not `Debug`: it carries the plain-text password.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /api/auth/register`.
///
/// Deliberately not `Debug`: it carries the plain-text password.
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Reply to login or register.
///
/// Every field is optional: a reply without a token is a failed login even
/// when the status code says otherwise.
#[derive(Debug, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// Read a reply body field by field.
    ///
    /// A malformed `user` only loses the user; the token and message are
    /// still picked up.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_owned);
        let user = body
            .get("user")
            .filter(|user| user.is_object())
            .and_then(|user| match SessionUser::deserialize(user) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed user in auth reply");
                    None
                }
            });
        Self {
            token: text("token"),
            user,
            message: text("message"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use francine_core::ProductId;
    use serde_json::json;

    #[test]
    fn test_guest_order_omits_blank_optionals() {
        let order = GuestOrder {
            name: "Ana".to_owned(),
            email: Some("ana@example.com".to_owned()),
            phone: None,
            address: None,
            total: Price::from_cents(2000),
            items: vec![LineItem {
                id: ProductId::new("p1"),
                name: "Widget".to_owned(),
                unit_price: Price::from_cents(1000),
                quantity: 2,
            }],
        };
        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({
                "name": "Ana",
                "email": "ana@example.com",
                "total": 20,
                "items": [{"id": "p1", "name": "Widget", "price": 10, "qty": 2}]
            })
        );
    }

    #[test]
    fn test_auth_response_tolerates_missing_fields() {
        let reply: AuthResponse = serde_json::from_value(json!({"message": "nope"})).unwrap();
        assert!(reply.token.is_none());
        assert!(reply.user.is_none());
        assert_eq!(reply.message.as_deref(), Some("nope"));
    }

    #[test]
    fn test_auth_reply_keeps_token_next_to_odd_user() {
        let reply = AuthResponse::from_body(&json!({
            "token": "t-1",
            "user": {"name": "Ana", "role": null},
            "message": "ok"
        }));
        assert_eq!(reply.token.as_deref(), Some("t-1"));
        assert_eq!(reply.user.unwrap().name, "Ana");
        assert_eq!(reply.message.as_deref(), Some("ok"));

        let reply = AuthResponse::from_body(&json!({"token": "t-2", "user": "Ana"}));
        assert_eq!(reply.token.as_deref(), Some("t-2"));
        assert!(reply.user.is_none());
    }
}
