use crate::{
    db::with_deadline,
    dto::orders::{CreateOrderRequest, OrderList},
    error::{AppError, AppResult},
    models::Order,
    response::{ApiResponse, Meta},
    state::AppState,
};

const ORDER_COLUMNS: &str = "id, user_id, product_id, quantity, status, total, order_date";

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let sql = format!(
        "INSERT INTO orders (user_id, product_id, quantity, status, total) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {ORDER_COLUMNS}"
    );
    let order = with_deadline(
        state.query_timeout,
        sqlx::query_as::<_, Order>(&sql)
            .bind(payload.user_id)
            .bind(payload.product_id)
            .bind(payload.quantity)
            .bind(payload.status)
            .bind(payload.total)
            .fetch_one(&state.pool),
    )
    .await?;

    tracing::info!(order_id = order.id, "order created");
    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(state: &AppState) -> AppResult<ApiResponse<OrderList>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id");
    let items = with_deadline(
        state.query_timeout,
        sqlx::query_as::<_, Order>(&sql).fetch_all(&state.pool),
    )
    .await?;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, id: i64) -> AppResult<ApiResponse<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
    let order = with_deadline(
        state.query_timeout,
        sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&state.pool),
    )
    .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order not found".into())),
    };
    Ok(ApiResponse::success("Order", order, Some(Meta::empty())))
}
