//! # REST API
//!
//! Builds the axum router that exposes one sale over HTTP. All endpoints
//! share application state through axum's `State` extractor.
//!
//! The caller address travels in the request body. Authenticating it is the
//! job of whatever transaction layer sits in front of this service; the API
//! only forwards it to the controller's privilege and entitlement checks.
//!
//! ## Endpoints
//!
//! | Method | Path                     | Description                        |
//! |--------|--------------------------|------------------------------------|
//! | GET    | `/health`                | Liveness probe                     |
//! | GET    | `/status`                | Sale snapshot                      |
//! | POST   | `/mint`                  | Public mint                        |
//! | POST   | `/whitelist/mint`        | Whitelist mint                     |
//! | POST   | `/whitelist/check`       | Read-only proof check              |
//! | GET    | `/tokens/:address`       | Identifiers held by an address     |
//! | POST   | `/admin/give-away`       | Issue from the reserved pool       |
//! | POST   | `/admin/presale-params`  | Rotate root and top up presale     |
//! | POST   | `/admin/pause`           | Set the pause gate                 |
//! | POST   | `/admin/presale`         | Set the presale gate               |
//! | POST   | `/admin/price`           | Set the unit price                 |
//! | POST   | `/admin/wallet-limit`    | Set the per-wallet cap             |
//! | POST   | `/admin/withdraw`        | Sweep proceeds to the beneficiary  |

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Path, Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mintgate_contracts::{
    AllocationSnapshot, ErrorCategory, MintController, MintError, MintReceipt, Transfer,
};
use mintgate_protocol::config::wei_string;
use mintgate_protocol::merkle::Proof;
use mintgate_protocol::types::hex32;
use mintgate_protocol::{Address, Hash32, TokenId, Wei};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone. The controller sits behind a single mutex: every request
/// takes it once, so guard evaluation and commit can never interleave with
/// another request.
#[derive(Clone)]
pub struct AppState {
    /// The service's reported version string.
    pub version: String,
    /// The sale.
    pub controller: Arc<Mutex<MintController>>,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/mint", post(public_mint_handler))
        .route("/whitelist/mint", post(whitelist_mint_handler))
        .route("/whitelist/check", post(whitelist_check_handler))
        .route("/tokens/:address", get(tokens_handler))
        .route("/admin/give-away", post(give_away_handler))
        .route("/admin/presale-params", post(presale_params_handler))
        .route("/admin/pause", post(pause_handler))
        .route("/admin/presale", post(presale_handler))
        .route("/admin/price", post(price_handler))
        .route("/admin/wallet-limit", post(wallet_limit_handler))
        .route("/admin/withdraw", post(withdraw_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request Types
// ---------------------------------------------------------------------------

/// Body of `POST /mint`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicMintRequest {
    pub caller: Address,
    pub amount: u64,
    /// Attached value in wei.
    #[serde(with = "wei_string")]
    pub paid: Wei,
}

/// Body of `POST /whitelist/mint`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WhitelistMintRequest {
    pub caller: Address,
    pub amount: u64,
    #[serde(default)]
    pub proof: Proof,
    #[serde(with = "wei_string")]
    pub paid: Wei,
}

/// Body of `POST /whitelist/check`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WhitelistCheckRequest {
    pub address: Address,
    #[serde(default)]
    pub proof: Proof,
}

/// Body of `POST /admin/give-away`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GiveAwayRequest {
    pub caller: Address,
    pub to: Address,
    pub amount: u64,
}

/// Body of `POST /admin/presale-params`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresaleParamsRequest {
    pub caller: Address,
    #[serde(with = "hex32")]
    pub root: Hash32,
    /// Added to the presale pool, not assigned.
    #[serde(default)]
    pub additional_amount: u64,
}

/// Body of the single-value admin setters.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetRequest<T> {
    pub caller: Address,
    pub value: T,
}

/// Body of `POST /admin/price`. Wei needs its own string adapter.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceRequest {
    pub caller: Address,
    #[serde(with = "wei_string")]
    pub value: Wei,
}

/// Body of `POST /admin/withdraw`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub caller: Address,
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Response payload for `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service software version.
    pub version: String,
    pub owner: Address,
    pub beneficiary: Address,
    #[serde(flatten)]
    pub sale: AllocationSnapshot,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Response payload for `POST /whitelist/check`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WhitelistCheckResponse {
    pub address: Address,
    pub whitelisted: bool,
}

/// Response payload for `GET /tokens/:address`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokensResponse {
    pub address: Address,
    pub balance: usize,
    pub tokens: Vec<TokenId>,
}

/// Response payload for admin setters that return nothing.
#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short reason code, e.g. `!EthAmount`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures a handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// The controller rejected the request.
    Mint(MintError),
    /// The request could not be parsed into controller inputs.
    BadRequest(String),
}

impl From<MintError> for ApiError {
    fn from(err: MintError) -> Self {
        ApiError::Mint(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Mint(err) => (
                status_for(err.category()),
                ErrorResponse {
                    error: err.reason().to_string(),
                    message: err.to_string(),
                },
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "bad_request".into(),
                    message,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// `Json` whose rejections come back as an [`ErrorResponse`] body.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Entitlement => StatusCode::FORBIDDEN,
        ErrorCategory::Payment => StatusCode::PAYMENT_REQUIRED,
        ErrorCategory::Capacity => StatusCode::CONFLICT,
        ErrorCategory::Argument => StatusCode::BAD_REQUEST,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 if the service is alive.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — current phase, pools, counters, price, and root.
async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let controller = state.controller.lock();
    Json(StatusResponse {
        version: state.version.clone(),
        owner: controller.owner(),
        beneficiary: controller.beneficiary(),
        sale: controller.snapshot(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn public_mint_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PublicMintRequest>,
) -> Result<Json<MintReceipt>, ApiError> {
    let mut controller = state.controller.lock();
    let result = controller.public_mint(req.caller, req.amount, req.paid);
    record_mint(&state, "public", &result);
    state.metrics.observe(controller.state());
    Ok(Json(result?))
}

async fn whitelist_mint_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<WhitelistMintRequest>,
) -> Result<Json<MintReceipt>, ApiError> {
    let mut controller = state.controller.lock();
    let result = controller.whitelist_mint(req.caller, req.amount, &req.proof, req.paid);
    record_mint(&state, "whitelist", &result);
    state.metrics.observe(controller.state());
    Ok(Json(result?))
}

async fn whitelist_check_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<WhitelistCheckRequest>,
) -> Json<WhitelistCheckResponse> {
    let whitelisted = state.controller.lock().is_whitelisted(&req.address, &req.proof);
    Json(WhitelistCheckResponse {
        address: req.address,
        whitelisted,
    })
}

/// `GET /tokens/:address` — unknown holders get an empty list, not a 404.
async fn tokens_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<TokensResponse>, ApiError> {
    let address: Address = address
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid address: {e}")))?;
    let controller = state.controller.lock();
    let tokens = controller.ledger().tokens_of(&address).to_vec();
    Ok(Json(TokensResponse {
        address,
        balance: tokens.len(),
        tokens,
    }))
}

async fn give_away_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GiveAwayRequest>,
) -> Result<Json<MintReceipt>, ApiError> {
    let mut controller = state.controller.lock();
    let result = controller.give_away(req.caller, req.to, req.amount);
    record_mint(&state, "give_away", &result);
    state.metrics.observe(controller.state());
    Ok(Json(result?))
}

async fn presale_params_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PresaleParamsRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let mut controller = state.controller.lock();
    controller.set_presale_params(req.caller, req.root, req.additional_amount)?;
    state.metrics.observe(controller.state());
    Ok(ack(&state))
}

async fn pause_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SetRequest<bool>>,
) -> Result<Json<AckResponse>, ApiError> {
    state.controller.lock().pause(req.caller, req.value)?;
    Ok(ack(&state))
}

async fn presale_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SetRequest<bool>>,
) -> Result<Json<AckResponse>, ApiError> {
    state.controller.lock().set_presale_active(req.caller, req.value)?;
    Ok(ack(&state))
}

async fn price_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PriceRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    state.controller.lock().set_price(req.caller, req.value)?;
    Ok(ack(&state))
}

async fn wallet_limit_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SetRequest<u64>>,
) -> Result<Json<AckResponse>, ApiError> {
    state
        .controller
        .lock()
        .set_per_wallet_limit(req.caller, req.value)?;
    Ok(ack(&state))
}

async fn withdraw_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<WithdrawRequest>,
) -> Result<Json<Transfer>, ApiError> {
    let transfer = state.controller.lock().withdraw(req.caller)?;
    state.metrics.admin_operations_total.inc();
    Ok(Json(transfer))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ack(state: &AppState) -> Json<AckResponse> {
    state.metrics.admin_operations_total.inc();
    Json(AckResponse { ok: true })
}

fn record_mint(state: &AppState, path: &str, result: &Result<MintReceipt, MintError>) {
    let metrics = &state.metrics;
    metrics.mint_requests_total.with_label_values(&[path]).inc();
    match result {
        Ok(receipt) => metrics
            .tokens_issued_total
            .with_label_values(&[path])
            .inc_by(receipt.count()),
        Err(err) => metrics
            .mint_rejections_total
            .with_label_values(&[path, err.reason()])
            .inc(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mintgate_protocol::config::DeploymentConfig;
    use mintgate_protocol::crypto::HashAlgorithm;
    use mintgate_protocol::merkle::MerkleTree;
    use tower::ServiceExt;

    const OWNER: &str = "0x00000000000000000000000000000000000000aa";
    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";
    const MALLORY: &str = "0x6666666666666666666666666666666666666666";

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    /// Creates a test AppState: ceiling 10, reserved 2, presale 2, price
    /// 100 wei, whitelist of Alice only. Paused, presale active.
    fn test_app_state() -> (AppState, MerkleTree) {
        let tree = MerkleTree::build([addr(ALICE)], HashAlgorithm::Keccak256).unwrap();
        let mut config = DeploymentConfig::new(
            addr(OWNER),
            Address::new([0xBB; 20]),
            10,
            2,
            2,
            tree.root(),
        );
        config.unit_price = 100;
        let controller = MintController::deploy(&config).unwrap();
        let state = AppState {
            version: "0.1.0-test".into(),
            controller: Arc::new(Mutex::new(controller)),
            metrics: Arc::new(crate::metrics::MintMetrics::new().unwrap()),
        };
        (state, tree)
    }

    /// Same as [`test_app_state`] but already in the public phase.
    fn public_app_state() -> AppState {
        let (state, _) = test_app_state();
        {
            let mut c = state.controller.lock();
            c.pause(addr(OWNER), false).unwrap();
            c.set_presale_active(addr(OWNER), false).unwrap();
        }
        state
    }

    /// Sends a GET request and returns the (status, body_bytes).
    async fn get(router: &Router, path: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        (status, body)
    }

    /// Sends a POST request with JSON body and returns (status, body_bytes).
    async fn post_json(
        router: &Router,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        (status, body)
    }

    fn error_reason(body: &[u8]) -> String {
        serde_json::from_slice::<ErrorResponse>(body).unwrap().error
    }

    // -- Read-only ------------------------------------------------------------

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let (state, _) = test_app_state();
        let router = create_router(state);
        let (status, body) = get(&router, "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn status_reports_snapshot() {
        let (state, tree) = test_app_state();
        let router = create_router(state);
        let (status, body) = get(&router, "/status").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["phase"], "paused");
        assert_eq!(json["supplyCeiling"], 10);
        assert_eq!(json["presalePool"], 2);
        assert_eq!(json["unitPrice"], "100");
        assert_eq!(json["merkleRoot"], hex32::encode(&tree.root()));
        assert_eq!(json["owner"], OWNER);
    }

    #[tokio::test]
    async fn whitelist_check_is_read_only() {
        let (state, tree) = test_app_state();
        let router = create_router(state);
        let proof = tree.prove(&addr(ALICE)).unwrap();

        let (status, body) = post_json(
            &router,
            "/whitelist/check",
            serde_json::json!({ "address": ALICE, "proof": proof.to_hex() }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let resp: WhitelistCheckResponse = serde_json::from_slice(&body).unwrap();
        assert!(resp.whitelisted);

        let (_, body) = post_json(
            &router,
            "/whitelist/check",
            serde_json::json!({ "address": BOB, "proof": [] }),
        )
        .await;
        let resp: WhitelistCheckResponse = serde_json::from_slice(&body).unwrap();
        assert!(!resp.whitelisted);
    }

    #[tokio::test]
    async fn tokens_rejects_bad_address() {
        let (state, _) = test_app_state();
        let router = create_router(state);
        let (status, body) = get(&router, "/tokens/not-an-address").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_reason(&body), "bad_request");
    }

    // -- Minting --------------------------------------------------------------

    #[tokio::test]
    async fn public_mint_then_tokens() {
        let state = public_app_state();
        let router = create_router(state.clone());

        let (status, body) = post_json(
            &router,
            "/mint",
            serde_json::json!({ "caller": BOB, "amount": 2, "paid": "250" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ids"]["start"], 0);
        assert_eq!(json["ids"]["end"], 2);
        assert_eq!(json["refund"]["amount"], "50");

        let (status, body) = get(&router, &format!("/tokens/{BOB}")).await;
        assert_eq!(status, StatusCode::OK);
        let resp: TokensResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.tokens, vec![0, 1]);

        assert_eq!(state.metrics.issued_count.get(), 2);
        assert_eq!(
            state
                .metrics
                .tokens_issued_total
                .with_label_values(&["public"])
                .get(),
            2
        );
    }

    #[tokio::test]
    async fn public_mint_error_statuses() {
        let state = public_app_state();
        let router = create_router(state.clone());

        let (status, body) = post_json(
            &router,
            "/mint",
            serde_json::json!({ "caller": BOB, "amount": 1, "paid": 99 }),
        )
        .await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(error_reason(&body), "!EthAmount");

        let (status, body) = post_json(
            &router,
            "/mint",
            serde_json::json!({ "caller": BOB, "amount": 3, "paid": "300" }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_reason(&body), "!BoredAmount");

        let (status, _) = post_json(
            &router,
            "/mint",
            serde_json::json!({ "caller": BOB, "amount": 0, "paid": "0" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(
            state
                .metrics
                .mint_rejections_total
                .with_label_values(&["public", "!EthAmount"])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn paused_sale_is_forbidden() {
        let (state, _) = test_app_state();
        let router = create_router(state);
        let (status, body) = post_json(
            &router,
            "/mint",
            serde_json::json!({ "caller": BOB, "amount": 1, "paid": "100" }),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_reason(&body), "Paused");
    }

    #[tokio::test]
    async fn whitelist_mint_flow() {
        let (state, tree) = test_app_state();
        state.controller.lock().pause(addr(OWNER), false).unwrap();
        let router = create_router(state.clone());
        let proof = tree.prove(&addr(ALICE)).unwrap().to_hex();

        let (status, _) = post_json(
            &router,
            "/whitelist/mint",
            serde_json::json!({ "caller": ALICE, "amount": 2, "proof": proof, "paid": "200" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.metrics.presale_pool_remaining.get(), 0);

        let (status, body) = post_json(
            &router,
            "/whitelist/mint",
            serde_json::json!({ "caller": BOB, "amount": 1, "proof": [], "paid": "100" }),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_reason(&body), "!whitelist");
    }

    // -- Admin ----------------------------------------------------------------

    #[tokio::test]
    async fn admin_routes_reject_non_owner() {
        let (state, _) = test_app_state();
        let router = create_router(state);

        for (path, body) in [
            ("/admin/pause", serde_json::json!({ "caller": MALLORY, "value": false })),
            ("/admin/presale", serde_json::json!({ "caller": MALLORY, "value": false })),
            ("/admin/price", serde_json::json!({ "caller": MALLORY, "value": "0" })),
            ("/admin/wallet-limit", serde_json::json!({ "caller": MALLORY, "value": 9 })),
            ("/admin/withdraw", serde_json::json!({ "caller": MALLORY })),
            (
                "/admin/give-away",
                serde_json::json!({ "caller": MALLORY, "to": MALLORY, "amount": 1 }),
            ),
        ] {
            let (status, resp) = post_json(&router, path, body).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
            assert_eq!(error_reason(&resp), "Ownable: caller is not the owner");
        }
    }

    #[tokio::test]
    async fn presale_params_adds_to_pool() {
        let (state, _) = test_app_state();
        let router = create_router(state.clone());
        let root = hex32::encode(&[7; 32]);

        let (status, _) = post_json(
            &router,
            "/admin/presale-params",
            serde_json::json!({ "caller": OWNER, "root": root, "additionalAmount": 3 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let c = state.controller.lock();
        assert_eq!(c.state().presale_pool(), 5);
        assert_eq!(c.state().current_root(), [7; 32]);
    }

    #[tokio::test]
    async fn give_away_and_withdraw() {
        let state = public_app_state();
        let router = create_router(state.clone());

        let (status, body) = post_json(
            &router,
            "/admin/give-away",
            serde_json::json!({ "caller": OWNER, "to": ALICE, "amount": 3 }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_reason(&body), ">reserved");

        let (status, body) = post_json(
            &router,
            "/admin/give-away",
            serde_json::json!({ "caller": OWNER, "to": Address::ZERO, "amount": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_reason(&body), "_to==0");

        post_json(
            &router,
            "/mint",
            serde_json::json!({ "caller": BOB, "amount": 2, "paid": "200" }),
        )
        .await;
        let (status, body) = post_json(
            &router,
            "/admin/withdraw",
            serde_json::json!({ "caller": OWNER }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["amount"], "200");
        assert_eq!(json["kind"], "withdrawal");
    }

    // -- Malformed bodies -----------------------------------------------------

    #[tokio::test]
    async fn malformed_address_is_json_bad_request() {
        let router = create_router(public_app_state());
        let (status, body) = post_json(
            &router,
            "/mint",
            serde_json::json!({ "caller": "0x1234", "amount": 1, "paid": "100" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.error, "bad_request");
        assert!(!err.message.is_empty());
    }

    #[tokio::test]
    async fn missing_field_is_json_bad_request() {
        let (state, _) = test_app_state();
        let router = create_router(state.clone());
        let (status, body) = post_json(
            &router,
            "/admin/give-away",
            serde_json::json!({ "caller": OWNER, "amount": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_reason(&body), "bad_request");
        assert_eq!(state.controller.lock().state().reserved_pool(), 2);
    }

    #[tokio::test]
    async fn non_json_body_is_json_bad_request() {
        let router = create_router(public_app_state());
        let req = Request::builder()
            .method("POST")
            .uri("/admin/pause")
            .body(Body::from("paused=true"))
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(error_reason(&body), "bad_request");
    }
}
