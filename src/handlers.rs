// region:    --- Imports
use crate::auction::{AuctionService, NewAuction, PublicAuction};
use crate::billing::calc::{bill_totals, item_breakdown, BillTotals, ItemBreakdown};
use crate::billing::validation::validate_draft;
use crate::billing::{
    Bill, BillDraft, BillItem, BillingService, ItemEdit, ValidationIssue, VendorBillingSettings,
};
use crate::bidding::{BuyNowCommand, PlaceBidCommand};
use crate::error::AppError;
use crate::pricing::{MetalPrices, PriceBoard};
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

// region:    --- App State
#[derive(Clone)]
pub struct AppState {
    pub auctions: Arc<AuctionService>,
    pub billing: Arc<BillingService>,
    pub prices: PriceBoard,
}
// endregion: --- App State

// region:    --- Request / Response Bodies
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskQuestionRequest {
    pub asked_by: String,
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerQuestionRequest {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct EditItemRequest {
    pub item: BillItem,
    pub edit: ItemEdit,
}

#[derive(Debug, Serialize)]
pub struct BillPreview {
    pub totals: BillTotals,
    pub issues: Vec<ValidationIssue>,
}
// endregion: --- Request / Response Bodies

// region:    --- Misc Handlers
pub async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn handle_get_prices(State(state): State<AppState>) -> Json<MetalPrices> {
    Json(state.prices.latest().await)
}
// endregion: --- Misc Handlers

// region:    --- Auction Handlers
pub async fn handle_create_auction(
    State(state): State<AppState>,
    Json(input): Json<NewAuction>,
) -> Result<(StatusCode, Json<PublicAuction>), AppError> {
    info!("{:<12} --> create auction seller: {}", "Handler", input.seller_name);
    let auction = state.auctions.create(input).await?;
    Ok((StatusCode::CREATED, Json(PublicAuction::from(&auction))))
}

pub async fn handle_list_auctions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicAuction>>, AppError> {
    Ok(Json(state.auctions.list().await?))
}

pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<String>,
) -> Result<Json<PublicAuction>, AppError> {
    let auction = state.auctions.get(&auction_id).await?;
    Ok(Json(PublicAuction::from(&auction)))
}

pub async fn handle_place_bid(
    State(state): State<AppState>,
    Path(auction_id): Path<String>,
    Json(cmd): Json<PlaceBidCommand>,
) -> Result<Json<PublicAuction>, AppError> {
    info!("{:<12} --> bid request: {:?}", "Handler", cmd);
    let auction = state.auctions.place_bid(&auction_id, cmd).await?;
    Ok(Json(PublicAuction::from(&auction)))
}

pub async fn handle_buy_now(
    State(state): State<AppState>,
    Path(auction_id): Path<String>,
    Json(cmd): Json<BuyNowCommand>,
) -> Result<Json<PublicAuction>, AppError> {
    info!("{:<12} --> buy now request: {:?}", "Handler", cmd);
    let auction = state.auctions.buy_now(&auction_id, cmd).await?;
    Ok(Json(PublicAuction::from(&auction)))
}

pub async fn handle_ask_question(
    State(state): State<AppState>,
    Path(auction_id): Path<String>,
    Json(req): Json<AskQuestionRequest>,
) -> Result<Json<PublicAuction>, AppError> {
    let auction = state
        .auctions
        .ask_question(&auction_id, &req.asked_by, &req.question)
        .await?;
    Ok(Json(PublicAuction::from(&auction)))
}

pub async fn handle_answer_question(
    State(state): State<AppState>,
    Path((auction_id, index)): Path<(String, usize)>,
    Json(req): Json<AnswerQuestionRequest>,
) -> Result<Json<PublicAuction>, AppError> {
    let auction = state
        .auctions
        .answer_question(&auction_id, index, &req.answer)
        .await?;
    Ok(Json(PublicAuction::from(&auction)))
}
// endregion: --- Auction Handlers

// region:    --- Billing Calculator Handlers
pub async fn handle_preview_item(Json(item): Json<BillItem>) -> Json<ItemBreakdown> {
    Json(item_breakdown(&item))
}

/// Applies one field edit to a detached line, keeping percent and flat value in sync
pub async fn handle_edit_item(Json(req): Json<EditItemRequest>) -> Json<BillItem> {
    let mut item = req.item;
    item.apply(req.edit);
    Json(item)
}

pub async fn handle_preview_bill(Json(draft): Json<BillDraft>) -> Json<BillPreview> {
    Json(BillPreview {
        totals: bill_totals(&draft.items, draft.round_off),
        issues: validate_draft(&draft),
    })
}
// endregion: --- Billing Calculator Handlers

// region:    --- Billing Session Handlers
pub async fn handle_get_settings(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> Result<Json<VendorBillingSettings>, AppError> {
    Ok(Json(state.billing.settings(&vendor_id).await?))
}

pub async fn handle_put_settings(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Json(settings): Json<VendorBillingSettings>,
) -> Result<Json<VendorBillingSettings>, AppError> {
    Ok(Json(state.billing.update_settings(&vendor_id, settings).await?))
}

pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> Result<Json<BillDraft>, AppError> {
    Ok(Json(state.billing.draft(&vendor_id).await?))
}

pub async fn handle_put_draft(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Json(draft): Json<BillDraft>,
) -> Result<Json<BillDraft>, AppError> {
    Ok(Json(state.billing.replace_draft(&vendor_id, draft).await?))
}

pub async fn handle_add_draft_item(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> Result<(StatusCode, Json<BillItem>), AppError> {
    let item = state.billing.add_item(&vendor_id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn handle_edit_draft_item(
    State(state): State<AppState>,
    Path((vendor_id, item_id)): Path<(String, String)>,
    Json(edit): Json<ItemEdit>,
) -> Result<Json<BillItem>, AppError> {
    Ok(Json(state.billing.edit_item(&vendor_id, &item_id, edit).await?))
}

pub async fn handle_remove_draft_item(
    State(state): State<AppState>,
    Path((vendor_id, item_id)): Path<(String, String)>,
) -> Result<Json<BillItem>, AppError> {
    Ok(Json(state.billing.remove_item(&vendor_id, &item_id).await?))
}

pub async fn handle_save_bill(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> Result<(StatusCode, Json<Bill>), AppError> {
    let bill = state.billing.save_bill(&vendor_id).await?;
    Ok((StatusCode::CREATED, Json(bill)))
}

pub async fn handle_bill_history(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> Result<Json<Vec<Bill>>, AppError> {
    Ok(Json(state.billing.history(&vendor_id).await?))
}

pub async fn handle_load_bill(
    State(state): State<AppState>,
    Path((vendor_id, bill_number)): Path<(String, String)>,
) -> Result<Json<BillDraft>, AppError> {
    Ok(Json(state.billing.load_bill(&vendor_id, &bill_number).await?))
}

pub async fn handle_bill_text(
    State(state): State<AppState>,
    Path((vendor_id, bill_number)): Path<(String, String)>,
) -> Result<String, AppError> {
    state.billing.bill_text(&vendor_id, &bill_number).await
}
// endregion: --- Billing Session Handlers

// region:    --- Router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/prices", get(handle_get_prices))
        .route(
            "/auctions",
            post(handle_create_auction).get(handle_list_auctions),
        )
        .route("/auctions/:id", get(handle_get_auction))
        .route("/auctions/:id/bids", post(handle_place_bid))
        .route("/auctions/:id/buy-now", post(handle_buy_now))
        .route("/auctions/:id/questions", post(handle_ask_question))
        .route(
            "/auctions/:id/questions/:index/answer",
            post(handle_answer_question),
        )
        .route("/billing/items/preview", post(handle_preview_item))
        .route("/billing/items/edit", post(handle_edit_item))
        .route("/billing/bills/preview", post(handle_preview_bill))
        .route(
            "/billing/:vendor_id/settings",
            get(handle_get_settings).put(handle_put_settings),
        )
        .route(
            "/billing/:vendor_id/draft",
            get(handle_get_draft).put(handle_put_draft),
        )
        .route("/billing/:vendor_id/draft/items", post(handle_add_draft_item))
        .route(
            "/billing/:vendor_id/draft/items/:item_id",
            patch(handle_edit_draft_item).delete(handle_remove_draft_item),
        )
        .route(
            "/billing/:vendor_id/bills",
            post(handle_save_bill).get(handle_bill_history),
        )
        .route(
            "/billing/:vendor_id/bills/:bill_number/load",
            post(handle_load_bill),
        )
        .route(
            "/billing/:vendor_id/bills/:bill_number/text",
            get(handle_bill_text),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}
// endregion: --- Router
