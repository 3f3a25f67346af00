//! Wallet order handlers backed by Supabase.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use cubalink_core::{IdempotencyKey, OrderNumber, WalletOrderRequest};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Created order response.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    /// Always true.
    pub success: bool,
    /// Database id of the order row.
    pub order_id: String,
    /// Human-facing order number.
    pub order_number: OrderNumber,
    /// Status message.
    pub message: String,
}

/// Store an order the app has already paid from the wallet.
///
/// The order row is inserted first; its id keys the item rows. If the items
/// are rejected the order row is deleted again. The activity entry is
/// best-effort.
pub async fn create_from_wallet(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<WalletOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), ApiError> {
    let supabase = state.supabase()?;

    let order_number = OrderNumber::wallet(Utc::now(), &IdempotencyKey::generate().short());
    let order_row = request.to_order_row(order_number.clone());

    let inserted: Vec<Value> = supabase.insert("orders", &order_row).await?;
    let order_id = inserted
        .first()
        .and_then(|row| row.get("id"))
        .and_then(id_string)
        .ok_or_else(|| ApiError::ExternalService("Supabase returned no order id".into()))?;

    tracing::info!(
        order_id = %order_id,
        order_number = %order_number,
        items = request.cart_items.len(),
        "Wallet order stored"
    );

    let items = request.to_item_rows(&order_id);
    if !items.is_empty() {
        if let Err(e) = supabase.insert::<_, Value>("order_items", &items).await {
            tracing::warn!(order_id = %order_id, error = %e, "Order items rejected, removing order");
            if let Err(cleanup) = supabase.delete("orders", "id", &order_id).await {
                tracing::error!(
                    order_id = %order_id,
                    error = %cleanup,
                    "Failed to remove order without items"
                );
            }
            return Err(e.into());
        }
    }

    let activity = request.to_activity_row(&order_id, &order_number);
    if let Err(e) = supabase.insert::<_, Value>("activities", &activity).await {
        tracing::warn!(order_id = %order_id, error = %e, "Failed to record order activity");
    }

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            success: true,
            order_id,
            order_number,
            message: "Order created".to_string(),
        }),
    ))
}

/// Row ids may be UUID strings or integers.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_from_strings_and_numbers() {
        assert_eq!(id_string(&json!("a1b2")).as_deref(), Some("a1b2"));
        assert_eq!(id_string(&json!(17)).as_deref(), Some("17"));
        assert!(id_string(&json!("")).is_none());
        assert!(id_string(&Value::Null).is_none());
    }
}
