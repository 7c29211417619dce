use chrono::{Duration, TimeZone, Utc};
use jewel_market::auction::AuctionService;
use jewel_market::billing::BillingService;
use jewel_market::clock::{Clock, ManualClock};
use jewel_market::handlers::{self, AppState};
use jewel_market::pricing::{MetalPrices, PriceBoard};
use jewel_market::scheduler::AuctionScheduler;
use jewel_market::store::MemoryStore;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Tracing for test output; later calls are no-ops
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

struct TestApp {
    base: String,
    client: Client,
    clock: ManualClock,
    auctions: Arc<AuctionService>,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Serves the full router on an ephemeral port over a fresh memory store
async fn spawn_app() -> TestApp {
    init_tracing();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    let store = Arc::new(MemoryStore::new());
    let prices = PriceBoard::new(MetalPrices::mock("INR", clock.now()));
    let auctions = Arc::new(AuctionService::new(store.clone(), Arc::new(clock.clone())));
    let billing = Arc::new(BillingService::new(
        store,
        Arc::new(clock.clone()),
        prices.clone(),
    ));
    let router = handlers::router(AppState {
        auctions: Arc::clone(&auctions),
        billing,
        prices,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .unwrap();
    });

    TestApp {
        base: format!("http://{}", addr),
        client: Client::new(),
        clock,
        auctions,
    }
}

async fn create_auction(app: &TestApp, buy_now_price: Option<i64>) -> Value {
    let response = app
        .post(
            "/auctions",
            json!({
                "sellerName": "Kiran",
                "sellerPhone": "9800000000",
                "goldType": "Necklace",
                "purity": "22K",
                "weight": 20.0,
                "reservePrice": 100000,
                "buyNowPrice": buy_now_price,
                "fulfillmentMethod": "pickup",
                "location": "Jaipur",
                "durationHours": 1
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

fn bid(amount: i64) -> Value {
    json!({ "bidderId": "u1", "bidderName": "Anil", "amount": amount })
}

#[tokio::test]
async fn test_health_and_prices() {
    let app = spawn_app().await;
    assert!(app.get("/health").await.status().is_success());

    let prices: Value = app.get("/prices").await.json().await.unwrap();
    assert_eq!(prices["goldPerGram"], json!(7450.0));
    assert_eq!(prices["isMock"], json!(true));
}

#[tokio::test]
async fn test_place_bid() {
    let app = spawn_app().await;
    let auction = create_auction(&app, None).await;
    let id = auction["id"].as_str().unwrap();
    assert!(auction.get("reservePrice").is_none());
    assert_eq!(auction["minimumNextBid"], json!(500));

    let response = app.post(&format!("/auctions/{id}/bids"), bid(90_000)).await;
    assert!(response.status().is_success());
    let updated: Value = response.json().await.unwrap();
    info!("{:<12} --> bid accepted: {}", "Test", updated["highestBid"]);
    assert_eq!(updated["highestBid"], json!(90_000));
    assert_eq!(updated["minimumNextBid"], json!(90_500));
    assert_eq!(updated["reserveMet"], json!(false));
}

#[tokio::test]
async fn test_low_bid_rejected() {
    let app = spawn_app().await;
    let auction = create_auction(&app, None).await;
    let id = auction["id"].as_str().unwrap();
    app.post(&format!("/auctions/{id}/bids"), bid(90_000)).await;

    let response = app.post(&format!("/auctions/{id}/bids"), bid(90_400)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("LOW_BID"));
    assert_eq!(body["minimum_bid"], json!(90_500));

    let current: Value = app.get(&format!("/auctions/{id}")).await.json().await.unwrap();
    assert_eq!(current["bids"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_max_bid_keeps_auction_readable() {
    let app = spawn_app().await;
    let auction = create_auction(&app, None).await;
    let id = auction["id"].as_str().unwrap();

    let response = app.post(&format!("/auctions/{id}/bids"), bid(i64::MAX)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("AMOUNT_OUT_OF_RANGE"));

    let response = app.post(&format!("/auctions/{id}/bids"), bid(i64::MAX - 500)).await;
    assert!(response.status().is_success());

    let listed = app.get("/auctions").await;
    assert!(listed.status().is_success());
    let current: Value = app.get(&format!("/auctions/{id}")).await.json().await.unwrap();
    assert_eq!(current["minimumNextBid"], json!(i64::MAX));

    let response = app.post(&format!("/auctions/{id}/bids"), bid(500)).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("LOW_BID"));
}

#[tokio::test]
async fn test_vendor_only_refuses_customers() {
    let app = spawn_app().await;
    let response = app
        .post(
            "/auctions",
            json!({
                "sellerName": "Kiran",
                "goldType": "Bar",
                "purity": "24K",
                "weight": 50.0,
                "reservePrice": 300000,
                "buyNowPrice": 350000,
                "vendorOnly": true
            }),
        )
        .await;
    let auction: Value = response.json().await.unwrap();
    let id = auction["id"].as_str().unwrap();

    let response = app.post(&format!("/auctions/{id}/bids"), bid(1_000)).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("VENDOR_ONLY"));

    let response = app
        .post(
            &format!("/auctions/{id}/buy-now"),
            json!({ "buyerId": "u2", "buyerName": "Bela" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("VENDOR_ONLY"));
}

#[tokio::test]
async fn test_buy_now() {
    let app = spawn_app().await;
    let auction = create_auction(&app, Some(150_000)).await;
    let id = auction["id"].as_str().unwrap();

    let buyer = json!({ "buyerId": "u2", "buyerName": "Bela" });
    let response = app.post(&format!("/auctions/{id}/buy-now"), buyer.clone()).await;
    assert!(response.status().is_success());
    let closed: Value = response.json().await.unwrap();
    assert_eq!(closed["status"], json!("closed"));
    assert_eq!(closed["winner"]["amount"], json!(150_000));
    assert_eq!(closed["winner"]["viaBuyNow"], json!(true));

    // terminal: no more bids or purchases
    let response = app.post(&format!("/auctions/{id}/bids"), bid(200_000)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let response = app.post(&format!("/auctions/{id}/buy-now"), buyer).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_auction_lifecycle() {
    let app = spawn_app().await;
    let sold = create_auction(&app, None).await;
    let unsold = create_auction(&app, None).await;
    let sold_id = sold["id"].as_str().unwrap();
    let unsold_id = unsold["id"].as_str().unwrap();

    app.post(&format!("/auctions/{sold_id}/bids"), bid(105_000)).await;

    let response = app
        .post(
            &format!("/auctions/{sold_id}/questions"),
            json!({ "askedBy": "u1", "question": "Hallmarked?" }),
        )
        .await;
    assert!(response.status().is_success());
    let response = app
        .post(
            &format!("/auctions/{sold_id}/questions/0/answer"),
            json!({ "answer": "Yes" }),
        )
        .await;
    let answered: Value = response.json().await.unwrap();
    assert_eq!(answered["qna"][0]["a"], json!("Yes"));

    // late bid after expiry but before the sweep runs
    app.clock.advance(Duration::hours(1));
    let response = app.post(&format!("/auctions/{unsold_id}/bids"), bid(1_000)).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], json!("ALREADY_ENDED"));

    let scheduler = AuctionScheduler::new(
        Arc::clone(&app.auctions),
        std::time::Duration::from_secs(2),
    );
    assert_eq!(scheduler.tick().await, 2);

    let listed: Vec<Value> = app.get("/auctions").await.json().await.unwrap();
    let status_of = |id: &str| {
        listed
            .iter()
            .find(|a| a["id"] == json!(id))
            .map(|a| a["status"].clone())
            .unwrap()
    };
    assert_eq!(status_of(sold_id), json!("closed"));
    assert_eq!(status_of(unsold_id), json!("reserve_not_met"));

    let response = app.get("/auctions/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_billing_calculator_endpoints() {
    let app = spawn_app().await;
    let item = json!({
        "itemName": "Chain",
        "purity": "22K",
        "grossWeight": "10.5",
        "netWeight": 10,
        "goldRate": 6000,
        "makingChargePercent": 1,
        "makingChargeValue": 600,
        "wastagePercent": null,
        "wastageValue": 100,
        "gstEnabled": true
    });

    let breakdown: Value = app
        .post("/billing/items/preview", item.clone())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(breakdown["goldValue"], json!(60000.0));
    assert_eq!(breakdown["subtotal"], json!(60700.0));
    assert_eq!(breakdown["gst"], json!(1821.0));
    assert_eq!(breakdown["total"], json!(62521.0));

    let edited: Value = app
        .post(
            "/billing/items/edit",
            json!({ "item": item, "edit": { "field": "makingChargePercent", "value": "2" } }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(edited["makingChargeValue"], json!(1200.0));

    let preview: Value = app
        .post("/billing/bills/preview", json!({ "items": [] }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(preview["totals"]["grandTotal"], json!(0.0));
    assert_eq!(preview["issues"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_billing_session_save_and_receipt() {
    let app = spawn_app().await;
    let vendor = "/billing/v1";

    let response = app
        .client
        .put(app.url(&format!("{vendor}/settings")))
        .json(&json!({ "billPrefix": "jf", "shopName": "Lakshmi Jewellers" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // empty draft cannot be saved
    let response = app.post(&format!("{vendor}/bills"), json!({})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let item: Value = app
        .post(&format!("{vendor}/draft/items"), json!({}))
        .await
        .json()
        .await
        .unwrap();
    let item_id = item["id"].as_str().unwrap();
    assert_eq!(item["goldRate"], json!(7450.0));

    for edit in [
        json!({ "field": "itemName", "value": "Ring" }),
        json!({ "field": "netWeight", "value": 2 }),
        json!({ "field": "makingChargeValue", "value": 100 }),
    ] {
        let response = app
            .client
            .patch(app.url(&format!("{vendor}/draft/items/{item_id}")))
            .json(&edit)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let mut draft: Value = app.get(&format!("{vendor}/draft")).await.json().await.unwrap();
    draft["customer"]["name"] = json!("Lata");
    let response = app
        .client
        .put(app.url(&format!("{vendor}/draft")))
        .json(&draft)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = app.post(&format!("{vendor}/bills"), json!({})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let bill: Value = response.json().await.unwrap();
    let number = bill["billNumber"].as_str().unwrap();
    assert!(number.starts_with("JF-20240501-"));
    // 14900 + 100 = 15000, GST 450, rounded
    assert_eq!(bill["grandTotal"], json!(15450.0));

    let text = app
        .get(&format!("{vendor}/bills/{number}/text"))
        .await
        .text()
        .await
        .unwrap();
    assert!(text.contains("Lakshmi Jewellers"));
    assert!(text.contains(number));

    let history: Vec<Value> = app.get(&format!("{vendor}/bills")).await.json().await.unwrap();
    assert_eq!(history.len(), 1);

    let reloaded: Value = app
        .post(&format!("{vendor}/bills/{number}/load"), json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(reloaded["billNumber"], json!(number));

    let response = app.get(&format!("{vendor}/bills/NOPE/text")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
