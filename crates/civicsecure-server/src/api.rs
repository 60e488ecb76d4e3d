use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, Query, State},
    http::{HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use civicsecure_shared::constants::APP_NAME;
use civicsecure_shared::lifecycle::{apply_update, new_complaint};
use civicsecure_shared::protocol::{
    ComplaintListResponse, ComplaintResponse, CreateComplaintRequest, HealthResponse, ListQuery,
    StatsResponse, UpdateComplaintRequest,
};
use civicsecure_shared::validation::{parse_list_query, validate_new_complaint, validate_update};
use civicsecure_shared::Complaint;
use civicsecure_store::ComplaintRepository;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Complaint store shared by all handlers. Each request holds the lock only
/// for its own synchronous store calls.
pub type SharedRepository = Arc<Mutex<dyn ComplaintRepository + Send>>;

#[derive(Clone)]
pub struct AppState {
    pub repo: SharedRepository,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    fn repo(&self) -> Result<MutexGuard<'_, dyn ComplaintRepository + Send + 'static>, ServerError> {
        self.repo
            .lock()
            .map_err(|e| ServerError::Internal(format!("Lock poisoned: {e}")))
    }
}

pub fn build_router(state: AppState) -> Router {
    let allow_origin = match state
        .config
        .cors_allow_origin
        .as_deref()
        .and_then(|o| HeaderValue::from_str(o).ok())
    {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::from(AnyOrigin),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AnyOrigin);

    // Known paths with an unrouted method answer like unknown paths.
    Router::new()
        .route("/", get(root).fallback(route_not_found))
        .route("/api/health", get(health_check).fallback(route_not_found))
        .route(
            "/api/complaints",
            get(list_complaints)
                .post(create_complaint)
                .fallback(route_not_found),
        )
        .route(
            "/api/complaints/stats/summary",
            get(complaint_stats).fallback(route_not_found),
        )
        .route(
            "/api/complaints/:id",
            get(get_complaint)
                .put(update_complaint)
                .delete(delete_complaint)
                .fallback(route_not_found),
        )
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct RootResponse {
    message: String,
    status: &'static str,
    database: &'static str,
    timestamp: chrono::DateTime<Utc>,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{APP_NAME} Backend is running!"),
        status: "active",
        database: "SQLite",
        timestamp: Utc::now(),
    })
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.repo().map(|repo| repo.is_healthy()).unwrap_or(false);
    Json(HealthResponse {
        status: "healthy".to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        timestamp: Utc::now(),
    })
}

async fn list_complaints(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ComplaintListResponse>, ServerError> {
    let (filter, page) = parse_list_query(query);

    let (complaints, total) = state
        .repo()?
        .list_complaints(&filter, &page)
        .map_err(ServerError::store("Failed to fetch complaints"))?;

    Ok(Json(ComplaintListResponse {
        success: true,
        count: complaints.len(),
        total,
        page: page.page,
        pages: page.page_count(total),
        complaints,
    }))
}

async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ComplaintResponse>, ServerError> {
    let complaint = state
        .repo()?
        .find_complaint(&id)
        .map_err(ServerError::store("Failed to fetch complaint"))?
        .ok_or(ServerError::NotFound)?;

    Ok(Json(ComplaintResponse {
        success: true,
        message: None,
        complaint,
    }))
}

async fn create_complaint(
    State(state): State<AppState>,
    payload: Result<Json<CreateComplaintRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ComplaintResponse>), ServerError> {
    let Json(req) = payload?;
    let input = validate_new_complaint(req)?;

    let repo = state.repo()?;
    let existing = repo
        .find_complaint(&input.id)
        .map_err(ServerError::store("Failed to save complaint"))?;
    if existing.is_some() {
        warn!(id = %input.id, "Rejected duplicate complaint id");
        return Err(ServerError::Conflict);
    }

    let complaint = new_complaint(input, Utc::now());
    // A concurrent insert can still win the race; the store reports it as a conflict.
    repo.insert_complaint(&complaint)
        .map_err(ServerError::store("Failed to save complaint"))?;

    info!(
        id = %complaint.id,
        category = %complaint.category,
        reporter_type = %complaint.reporter_type,
        "New complaint saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(ComplaintResponse {
            success: true,
            message: Some("Complaint filed successfully".to_string()),
            complaint,
        }),
    ))
}

async fn update_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateComplaintRequest>, JsonRejection>,
) -> Result<Json<ComplaintResponse>, ServerError> {
    let Json(req) = payload?;
    let update = validate_update(req)?;
    let now = Utc::now();

    let complaint = state
        .repo()?
        .modify_complaint(&id, &mut |c: &mut Complaint| apply_update(c, &update, now))
        .map_err(ServerError::store("Failed to update complaint"))?
        .ok_or(ServerError::NotFound)?;

    info!(id = %complaint.id, status = %complaint.status, "Complaint updated");

    Ok(Json(ComplaintResponse {
        success: true,
        message: Some("Complaint updated successfully".to_string()),
        complaint,
    }))
}

async fn delete_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ComplaintResponse>, ServerError> {
    let complaint = state
        .repo()?
        .delete_complaint(&id)
        .map_err(ServerError::store("Failed to delete complaint"))?
        .ok_or(ServerError::NotFound)?;

    info!(id = %complaint.id, "Complaint deleted");

    Ok(Json(ComplaintResponse {
        success: true,
        message: Some("Complaint deleted successfully".to_string()),
        complaint,
    }))
}

async fn complaint_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ServerError> {
    let stats = state
        .repo()?
        .complaint_stats()
        .map_err(ServerError::store("Failed to fetch complaint statistics"))?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

async fn route_not_found(uri: Uri) -> ServerError {
    ServerError::RouteNotFound(uri.path().to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ServerError::Internal(detail).into_response()
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use civicsecure_shared::protocol::ComplaintStats;
    use civicsecure_shared::validation::{ComplaintFilter, Pagination};
    use civicsecure_store::{Database, StoreError};

    use super::*;

    fn test_app() -> Router {
        let db = Database::open_in_memory().unwrap();
        let repo: SharedRepository = Arc::new(Mutex::new(db));
        build_router(AppState {
            repo,
            config: Arc::new(ServerConfig::default()),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn complaint_body(id: &str) -> Value {
        json!({
            "id": id,
            "title": "Garbage collection delay",
            "category": "civic",
            "description": "Bins not emptied for a week",
            "location": "Sector 15",
            "department": "Sanitation Department",
        })
    }

    async fn create(app: &Router, body: Value) -> (StatusCode, Value) {
        send(app, "POST", "/api/complaints", Some(body)).await
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = test_app();

        let (status, body) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "active");
        assert_eq!(body["message"], "CivicSecure Backend is running!");

        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_create_returns_pending_with_one_history_entry() {
        let app = test_app();

        let (status, body) = create(&app, complaint_body("CMP-1")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Complaint filed successfully");

        let complaint = &body["complaint"];
        assert_eq!(complaint["status"], "Pending");
        assert_eq!(complaint["priority"], "Medium");
        assert_eq!(complaint["reporterType"], "anonymous");
        assert_eq!(complaint["assignedOfficer"], "Pending Assignment");
        assert_eq!(complaint["attachments"], 0);
        let history = complaint["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["step"], "Pending");
        assert_eq!(history[0]["officer"], "System");
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts_without_mutation() {
        let app = test_app();
        create(&app, complaint_body("CMP-1")).await;

        let mut dup = complaint_body("CMP-1");
        dup["title"] = json!("Something else");
        let (status, body) = create(&app, dup).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Complaint with this ID already exists");

        let (_, body) = send(&app, "GET", "/api/complaints/CMP-1", None).await;
        assert_eq!(body["complaint"]["title"], "Garbage collection delay");
    }

    #[tokio::test]
    async fn test_missing_required_field_is_rejected_and_not_persisted() {
        let app = test_app();

        for field in ["id", "title", "category", "description", "location", "department"] {
            let mut body = complaint_body("CMP-9");
            body.as_object_mut().unwrap().remove(field);
            let (status, resp) = create(&app, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "missing {field}");
            assert!(resp["error"]
                .as_str()
                .unwrap()
                .starts_with("Missing required fields"));
        }

        let (_, list) = send(&app, "GET", "/api/complaints", None).await;
        assert_eq!(list["total"], 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/complaints")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_status_remark_and_resolution() {
        let app = test_app();
        create(&app, complaint_body("CMP-1")).await;

        let (status, body) = send(
            &app,
            "PUT",
            "/api/complaints/CMP-1",
            Some(json!({ "remark": "Citizen called for an update" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let history = body["complaint"]["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1]["step"], "Pending");

        let (_, body) = send(
            &app,
            "PUT",
            "/api/complaints/CMP-1",
            Some(json!({
                "status": "Resolved",
                "remark": "Bins emptied",
                "officer": "Ward Officer",
                "assignedOfficer": "Ward Officer",
                "priority": "High"
            })),
        )
        .await;
        let complaint = &body["complaint"];
        assert_eq!(complaint["status"], "Resolved");
        assert_eq!(complaint["priority"], "High");
        assert_eq!(complaint["assignedOfficer"], "Ward Officer");
        let history = complaint["history"].as_array().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2]["step"], "Resolved");
        assert_eq!(history[2]["officer"], "Ward Officer");
        let resolved_on = complaint["actualResolution"].clone();
        assert!(resolved_on.is_string());

        let (_, body) = send(
            &app,
            "PUT",
            "/api/complaints/CMP-1",
            Some(json!({ "status": "Resolved" })),
        )
        .await;
        assert_eq!(body["complaint"]["actualResolution"], resolved_on);
        assert_eq!(body["complaint"]["history"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_unknown_id_and_bad_status() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "PUT",
            "/api/complaints/nope",
            Some(json!({ "status": "Resolved" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Complaint not found");

        create(&app, complaint_body("CMP-1")).await;
        let (status, body) = send(
            &app,
            "PUT",
            "/api/complaints/CMP-1",
            Some(json!({ "status": "Closed" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let app = test_app();
        for i in 0..12 {
            create(&app, complaint_body(&format!("P-{i}"))).await;
        }
        for i in 0..3 {
            create(&app, complaint_body(&format!("R-{i}"))).await;
            send(
                &app,
                "PUT",
                &format!("/api/complaints/R-{i}"),
                Some(json!({ "status": "Resolved" })),
            )
            .await;
        }

        let (status, body) = send(&app, "GET", "/api/complaints?status=Pending&page=1&limit=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 12);
        assert_eq!(body["count"], 10);
        assert_eq!(body["page"], 1);
        assert_eq!(body["pages"], 2);
        let items = body["complaints"].as_array().unwrap();
        assert!(items.iter().all(|c| c["status"] == "Pending"));

        let (_, body) = send(&app, "GET", "/api/complaints?status=Pending&page=2&limit=10", None).await;
        assert_eq!(body["count"], 2);

        let (_, body) = send(&app, "GET", "/api/complaints?limit=abc", None).await;
        assert_eq!(body["total"], 15);
        assert_eq!(body["count"], 10);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let app = test_app();
        let (status, _) = send(&app, "DELETE", "/api/complaints/CMP-1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        create(&app, complaint_body("CMP-1")).await;
        let (status, body) = send(&app, "DELETE", "/api/complaints/CMP-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["complaint"]["id"], "CMP-1");

        let (status, _) = send(&app, "GET", "/api/complaints/CMP-1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_summary() {
        let app = test_app();
        let plan = [
            ("1", "Pending", "civic"),
            ("2", "Pending", "civic"),
            ("3", "Pending", "theft"),
            ("4", "Resolved", "civic"),
            ("5", "Resolved", "safety"),
            ("6", "In Review", "theft"),
        ];
        for (id, status, category) in plan {
            let mut body = complaint_body(id);
            body["category"] = json!(category);
            create(&app, body).await;
            if status != "Pending" {
                send(&app, "PUT", &format!("/api/complaints/{id}"), Some(json!({ "status": status }))).await;
            }
        }

        let (status, body) = send(&app, "GET", "/api/complaints/stats/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        let stats = &body["stats"];
        assert_eq!(stats["total"], 6);
        assert_eq!(stats["pending"], 3);
        assert_eq!(stats["resolved"], 2);
        assert_eq!(stats["inReview"], 1);
        assert_eq!(stats["categories"][0], json!({ "category": "civic", "count": 3 }));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/api/nothing/here", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Route not found", "path": "/api/nothing/here" })
        );
    }

    #[tokio::test]
    async fn test_panics_become_generic_500() {
        async fn boom() -> &'static str {
            panic!("database exploded")
        }
        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let (status, body) = send(&app, "GET", "/boom", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "success": false, "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_known_path_with_unrouted_method_is_json_404() {
        let app = test_app();
        for (method, uri) in [
            ("PATCH", "/api/complaints/CMP-1"),
            ("POST", "/api/health"),
            ("DELETE", "/api/complaints"),
            ("PUT", "/api/complaints/stats/summary"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(
                body,
                json!({ "success": false, "error": "Route not found", "path": uri })
            );
        }
    }

    /// Repository whose storage is unreachable, or which loses the
    /// duplicate-id race on insert.
    struct StubRepository {
        lose_insert_race: bool,
    }

    fn broken() -> StoreError {
        StoreError::Migration("secret table layout".into())
    }

    impl ComplaintRepository for StubRepository {
        fn insert_complaint(&self, complaint: &Complaint) -> civicsecure_store::Result<()> {
            if self.lose_insert_race {
                Err(StoreError::Conflict(complaint.id.clone()))
            } else {
                Err(broken())
            }
        }

        fn find_complaint(&self, _id: &str) -> civicsecure_store::Result<Option<Complaint>> {
            if self.lose_insert_race {
                Ok(None)
            } else {
                Err(broken())
            }
        }

        fn list_complaints(
            &self,
            _filter: &ComplaintFilter,
            _page: &Pagination,
        ) -> civicsecure_store::Result<(Vec<Complaint>, u64)> {
            Err(broken())
        }

        fn modify_complaint(
            &mut self,
            _id: &str,
            _apply: &mut dyn FnMut(&mut Complaint),
        ) -> civicsecure_store::Result<Option<Complaint>> {
            Err(broken())
        }

        fn delete_complaint(&mut self, _id: &str) -> civicsecure_store::Result<Option<Complaint>> {
            Err(broken())
        }

        fn complaint_stats(&self) -> civicsecure_store::Result<ComplaintStats> {
            Err(broken())
        }

        fn is_healthy(&self) -> bool {
            false
        }
    }

    fn stub_app(lose_insert_race: bool) -> Router {
        let repo: SharedRepository = Arc::new(Mutex::new(StubRepository { lose_insert_race }));
        build_router(AppState {
            repo,
            config: Arc::new(ServerConfig::default()),
        })
    }

    #[tokio::test]
    async fn test_store_faults_are_500_without_detail() {
        let app = stub_app(false);

        for (method, uri, body, expected) in [
            ("GET", "/api/complaints", None, "Failed to fetch complaints"),
            ("POST", "/api/complaints", Some(complaint_body("CMP-9")), "Failed to save complaint"),
            ("GET", "/api/complaints/stats/summary", None, "Failed to fetch complaint statistics"),
            ("DELETE", "/api/complaints/CMP-9", None, "Failed to delete complaint"),
        ] {
            let (status, body) = send(&app, method, uri, body).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
            assert_eq!(body, json!({ "success": false, "error": expected }));
            assert!(!body.to_string().contains("secret"));
        }
    }

    #[tokio::test]
    async fn test_insert_conflict_after_precheck_is_409() {
        let app = stub_app(true);
        let (status, body) = create(&app, complaint_body("CMP-7")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Complaint with this ID already exists");
    }

    #[tokio::test]
    async fn test_health_reports_disconnected_store() {
        let app = stub_app(false);
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "disconnected");
    }
}
