//! Routes for the cart bounded context.

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;
use storefront_cart::application::command_handlers::{self, CartCommandResult, CheckoutReceipt};
use storefront_cart::application::query_handlers::{self, CartView};
use storefront_cart::domain::commands::CartCommand;
use storefront_core::product::{Product, ProductId};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /increment, /decrement and /remove.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// The product whose line is targeted.
    pub id: ProductId,
}

/// GET /
async fn get_cart(State(state): State<AppState>) -> Result<Json<CartView>, ApiError> {
    let view = query_handlers::get_cart(&state.cart)?;
    Ok(Json(view))
}

/// POST /add
#[instrument(skip(state, product), fields(product_id = product.id))]
async fn add(
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> Result<Json<CartCommandResult>, ApiError> {
    let result = command_handlers::handle_command(&CartCommand::Add(product), &state.cart)?;
    Ok(Json(result))
}

/// POST /increment
#[instrument(skip(state, request), fields(product_id = request.id))]
async fn increment(
    State(state): State<AppState>,
    Json(request): Json<LineRequest>,
) -> Result<Json<CartCommandResult>, ApiError> {
    let result =
        command_handlers::handle_command(&CartCommand::Increment(request.id), &state.cart)?;
    Ok(Json(result))
}

/// POST /decrement
#[instrument(skip(state, request), fields(product_id = request.id))]
async fn decrement(
    State(state): State<AppState>,
    Json(request): Json<LineRequest>,
) -> Result<Json<CartCommandResult>, ApiError> {
    let result =
        command_handlers::handle_command(&CartCommand::Decrement(request.id), &state.cart)?;
    Ok(Json(result))
}

/// POST /remove
#[instrument(skip(state, request), fields(product_id = request.id))]
async fn remove(
    State(state): State<AppState>,
    Json(request): Json<LineRequest>,
) -> Result<Json<CartCommandResult>, ApiError> {
    let result = command_handlers::handle_command(&CartCommand::Remove(request.id), &state.cart)?;
    Ok(Json(result))
}

/// POST /clear
#[instrument(skip(state))]
async fn clear(State(state): State<AppState>) -> Result<Json<CartCommandResult>, ApiError> {
    let result = command_handlers::handle_command(&CartCommand::Clear, &state.cart)?;
    Ok(Json(result))
}

/// POST /checkout
#[instrument(skip(state))]
async fn checkout(State(state): State<AppState>) -> Result<Json<CheckoutReceipt>, ApiError> {
    let receipt = command_handlers::handle_checkout(&state.cart, state.clock.as_ref())?;
    info!(order_id = %receipt.order_id, "simulated checkout completed");
    Ok(Json(receipt))
}

/// Returns the router for the cart context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/add", post(add))
        .route("/increment", post(increment))
        .route("/decrement", post(decrement))
        .route("/remove", post(remove))
        .route("/clear", post(clear))
        .route("/checkout", post(checkout))
}
