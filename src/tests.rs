//! Integration tests for the opsboard backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::client::{AuthState, HttpReportStore, ReportStore, StoreError};
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::editor::EditorSession;
use crate::models::ReportDomain;
use crate::{create_router, AppState};

const TEST_TOKEN: &str = "test-api-token";

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_token(Some(TEST_TOKEN.to_string())).await
    }

    async fn with_token(token: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            api_token: token.clone(),
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };

        let state = AppState {
            repo,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = token {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", key).parse().unwrap(),
            );
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn store(&self, token: Option<&str>) -> HttpReportStore {
        HttpReportStore::new(
            self.base_url.clone(),
            AuthState::new(token.map(|t| t.to_string())),
        )
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_token() {
    let fixture = TestFixture::new().await;

    // Request without Authorization header
    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/cloud-report/data"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_token() {
    let fixture = TestFixture::new().await;

    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/backup-server/data"))
        .header("Authorization", "Bearer wrong-token")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_auth_disabled_without_configured_token() {
    let fixture = TestFixture::with_token(None).await;

    let resp = fixture
        .client
        .get(fixture.url("/api/cloud-report/data"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_default_cloud_document() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/cloud-report/data"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["reportTitle"], "Cloud Status Report");
    assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 0);

    let columns: Vec<&str> = body["data"]["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert_eq!(
        columns,
        vec![
            "Server",
            "Status",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
            "SSL Expiry",
            "Space Used",
            "Remarks",
        ]
    );
}

#[tokio::test]
async fn test_default_backup_document() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/backup-server/data"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["reportTitle"], "Backup Server Cronjob Status");
    assert_eq!(body["data"]["columns"][1], "SERVER STATUS");
    // Backup reports carry no total-space summary
    assert!(body["data"].get("totalSpaceUsed").is_none());
}

#[tokio::test]
async fn test_save_and_fetch_roundtrip() {
    let fixture = TestFixture::new().await;

    let payload = json!({
        "reportTitle": "Week 3 Cloud Report",
        "reportDates": { "startDate": "2025-01-13", "endDate": "2025-01-19" },
        "columns": ["Server", "Status", "Remarks"],
        "rows": [
            { "Server": "web-1", "Status": "ONLINE", "Remarks": "" },
            { "Server": "db-1", "Status": "MAINTENANCE", "Remarks": "patch window" }
        ],
        "totalSpaceUsed": "2.5TB"
    });

    let save_resp = fixture
        .client
        .post(fixture.url("/api/cloud-report/save"))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(save_resp.status(), 200);
    let save_body: Value = save_resp.json().await.unwrap();
    assert_eq!(save_body["success"], true);
    assert!(save_body["data"]["updatedAt"].is_string());

    let get_resp = fixture
        .client
        .get(fixture.url("/api/cloud-report/data"))
        .send()
        .await
        .unwrap();

    let get_body: Value = get_resp.json().await.unwrap();
    assert_eq!(get_body["data"]["reportTitle"], "Week 3 Cloud Report");
    assert_eq!(get_body["data"]["totalSpaceUsed"], "2.5TB");
    assert_eq!(get_body["data"]["rows"].as_array().unwrap().len(), 2);
    assert_eq!(get_body["data"]["rows"][1]["Remarks"], "patch window");
    assert_eq!(get_body["data"]["reportDates"]["startDate"], "2025-01-13");
}

#[tokio::test]
async fn test_save_replaces_wholesale() {
    let fixture = TestFixture::new().await;

    let first = json!({
        "reportTitle": "Backup Report",
        "reportDates": { "startDate": "2025-01-01", "endDate": "2025-01-07" },
        "columns": ["Server", "SERVER STATUS"],
        "rows": [
            { "Server": "bak-1", "SERVER STATUS": "ONLINE" },
            { "Server": "bak-2", "SERVER STATUS": "OFFLINE" }
        ]
    });
    let second = json!({
        "reportTitle": "Backup Report",
        "reportDates": { "startDate": "2025-01-08", "endDate": "2025-01-14" },
        "columns": ["Server", "SERVER STATUS"],
        "rows": [
            { "Server": "bak-3", "SERVER STATUS": "ONLINE" }
        ]
    });

    for payload in [&first, &second] {
        let resp = fixture
            .client
            .post(fixture.url("/api/backup-server/save"))
            .json(payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let get_body: Value = fixture
        .client
        .get(fixture.url("/api/backup-server/data"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // The second save discarded the first entirely
    let rows = get_body["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Server"], "bak-3");
    assert_eq!(get_body["data"]["reportDates"]["startDate"], "2025-01-08");
}

#[tokio::test]
async fn test_save_rejects_invalid_columns() {
    let fixture = TestFixture::new().await;

    let empty_columns = json!({
        "reportTitle": "Bad",
        "reportDates": { "startDate": "2025-01-01", "endDate": "2025-01-07" },
        "columns": [],
        "rows": []
    });

    let resp = fixture
        .client
        .post(fixture.url("/api/cloud-report/save"))
        .json(&empty_columns)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let duplicate_columns = json!({
        "reportTitle": "Bad",
        "reportDates": { "startDate": "2025-01-01", "endDate": "2025-01-07" },
        "columns": ["Server", "Server"],
        "rows": []
    });

    let resp = fixture
        .client
        .post(fixture.url("/api/cloud-report/save"))
        .json(&duplicate_columns)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_editor_session_end_to_end() {
    let fixture = TestFixture::new().await;
    let store = fixture.store(Some(TEST_TOKEN));

    // Load defaults, edit both tables, save
    let mut session = EditorSession::new();
    session.refresh(&store).await.unwrap();
    assert!(!session.is_dirty());

    session.add_row(ReportDomain::Cloud);
    session.set_cell(ReportDomain::Cloud, 0, "Server", "web-1");
    session.set_cell(ReportDomain::Cloud, 0, "Status", "ONLINE");
    session.add_column(ReportDomain::Cloud, "Region").unwrap();
    session.set_cell(ReportDomain::Cloud, 0, "Region", "us-east");

    session.add_row(ReportDomain::Backup);
    session.set_cell(ReportDomain::Backup, 0, "Server", "bak-1");
    session.set_cell(ReportDomain::Backup, 0, "SERVER STATUS", "ONLINE");

    assert!(session.is_dirty());
    session.save(&store).await.unwrap();
    assert!(!session.is_dirty());

    // The post-save refresh picked up the server-assigned timestamp
    let (cloud_doc, _) = session.documents();
    assert!(cloud_doc.columns.contains(&"Region".to_string()));

    // A second session sees exactly what was saved
    let mut second = EditorSession::new();
    second.refresh(&store).await.unwrap();
    let cloud = second.table(ReportDomain::Cloud);
    assert_eq!(cloud.rows().len(), 1);
    assert_eq!(cloud.rows()[0].get("Region"), Some("us-east"));
    let backup = second.table(ReportDomain::Backup);
    assert_eq!(backup.rows()[0].get("SERVER STATUS"), Some("ONLINE"));
}

#[tokio::test]
async fn test_print_preview_against_live_store() {
    let fixture = TestFixture::new().await;
    let store = fixture.store(Some(TEST_TOKEN));

    let mut session = EditorSession::new();
    session.refresh(&store).await.unwrap();
    session.add_row(ReportDomain::Cloud);
    session.set_cell(ReportDomain::Cloud, 0, "Server", "web-1");
    session.set_cell(ReportDomain::Cloud, 0, "Status", "FAILED");

    // Dirty session: the preview saves first, then renders
    let html = session.print_preview(&store).await.unwrap();
    assert!(!session.is_dirty());
    assert!(html.contains("web-1"));
    assert!(html.contains("background-color: #ef4444")); // FAILED badge

    // The forced save is visible to other clients
    let body: Value = fixture
        .client
        .get(fixture.url("/api/cloud-report/data"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["rows"][0]["Server"], "web-1");
}

#[tokio::test]
async fn test_unauthorized_clears_auth_state() {
    let fixture = TestFixture::new().await;
    let store = fixture.store(Some("wrong-token"));
    assert!(store.auth().is_authenticated());

    let result = store.fetch(ReportDomain::Cloud).await;
    assert!(matches!(result, Err(StoreError::Unauthorized)));

    // Credentials are dropped so the UI layer routes back to login
    assert!(!store.auth().is_authenticated());
}

#[tokio::test]
async fn test_save_failure_keeps_session_dirty() {
    let fixture = TestFixture::new().await;
    // Valid token for reads, then break auth mid-session
    let store = fixture.store(Some(TEST_TOKEN));

    let mut session = EditorSession::new();
    session.refresh(&store).await.unwrap();
    session.add_row(ReportDomain::Cloud);

    store.auth().clear();
    let result = session.save(&store).await;
    assert!(result.is_err());
    assert!(session.is_dirty());
}
