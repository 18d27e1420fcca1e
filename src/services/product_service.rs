use crate::{
    db::with_deadline,
    dto::products::{CreateProductRequest, ProductList},
    error::AppResult,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let items = with_deadline(
        state.query_timeout,
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, created_at FROM products ORDER BY id",
        )
        .fetch_all(&state.pool),
    )
    .await?;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let product = with_deadline(
        state.query_timeout,
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, description, price) VALUES ($1, $2, $3) \
             RETURNING id, name, description, price, created_at",
        )
        .bind(payload.name)
        .bind(payload.description)
        .bind(payload.price)
        .fetch_one(&state.pool),
    )
    .await?;

    tracing::info!(product_id = product.id, "product created");
    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}
