use httpmock::prelude::*;
use reqwest::{Client, StatusCode, redirect};
use serde::Deserialize;
use serde_json::json;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailySummaryBody {
    total_time: f64,
    productive_time: f64,
    clients_worked_with: usize,
    average_productivity: f64,
}

#[derive(Debug, Deserialize)]
struct UserSummaryBody {
    user_id: i64,
    date: String,
    summary: DailySummaryBody,
    mean_productivity_score: f64,
    activity_count: usize,
}

struct TestServer {
    base_url: String,
    child: Child,
    _session_dir: TempDir,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Redirects are asserted on, never followed.
fn http() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("build http client")
}

#[cfg(unix)]
mod cleanup {
    use once_cell::sync::Lazy;
    use std::sync::{Mutex, Once};

    static REGISTER: Once = Once::new();
    static PIDS: Lazy<Mutex<Vec<i32>>> = Lazy::new(|| Mutex::new(Vec::new()));

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter().copied().filter(|pid| *pid > 0) {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = http().get(format!("{base_url}/healthz")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(backend: &MockServer) -> TestServer {
    let port = pick_free_port();
    let session_dir = tempfile::tempdir().expect("session dir");
    let child = Command::new(env!("CARGO_BIN_EXE_tracker_dashboard"))
        .env("PORT", port.to_string())
        .env("TRACKER_API_URL", backend.base_url())
        .env("SESSION_PATH", session_dir.path().join("session.json"))
        .env("REQUEST_TIMEOUT_SECS", "5")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        child,
        _session_dir: session_dir,
    }
}

async fn mock_login(backend: &MockServer, token: &str, role: &str) {
    let token = token.to_string();
    let role = role.to_string();
    backend
        .mock_async(move |when, then| {
            when.method(POST).path("/api/login");
            then.status(200).json_body(json!({
                "access_token": token,
                "token_type": "bearer",
                "role": role
            }));
        })
        .await;
}

async fn login(server: &TestServer) -> reqwest::Response {
    http()
        .post(format!("{}/login", server.base_url))
        .form(&[("username", "ana@x.io"), ("password", "secret")])
        .send()
        .await
        .unwrap()
}

fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn http_anonymous_home_redirects_to_login() {
    let backend = MockServer::start_async().await;
    let server = spawn_server(&backend).await;

    let response = http().get(format!("{}/", server.base_url)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let login_page = http()
        .get(format!("{}/login", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(login_page.status(), StatusCode::OK);
    assert!(login_page.text().await.unwrap().contains(r#"action="/login""#));
}

#[tokio::test]
async fn http_admin_login_and_user_summary() {
    let backend = MockServer::start_async().await;
    mock_login(&backend, "adm-token", "admin").await;
    let activities = backend
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/admin/users/7/activities-by-date")
                .query_param("date", "2026-01-05")
                .header("authorization", "Bearer adm-token");
            then.status(200).json_body(json!([
                { "id": 1, "duration_minutes": 120, "productivity_score": 8, "client_identified": "Acme" },
                { "id": 2, "duration_minutes": "60.0", "productivity_score": 3, "client_identified": "None" }
            ]));
        })
        .await;
    let server = spawn_server(&backend).await;

    let response = login(&server).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));

    let home = http().get(format!("{}/", server.base_url)).send().await.unwrap();
    assert_eq!(location(&home), Some("/admin"));

    let body: UserSummaryBody = http()
        .get(format!(
            "{}/api/admin/users/7/summary?date=2026-01-05",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    activities.assert_async().await;
    assert_eq!(body.user_id, 7);
    assert_eq!(body.date, "2026-01-05");
    assert_eq!(body.summary.total_time, 3.0);
    assert_eq!(body.summary.productive_time, 2.0);
    assert_eq!(body.summary.clients_worked_with, 1);
    assert_eq!(body.summary.average_productivity, 6.7);
    assert_eq!(body.mean_productivity_score, 5.5);
    assert_eq!(body.activity_count, 2);
}

#[tokio::test]
async fn http_employee_kept_out_of_admin() {
    let backend = MockServer::start_async().await;
    mock_login(&backend, "emp-token", "employee").await;
    let server = spawn_server(&backend).await;

    let response = login(&server).await;
    assert_eq!(location(&response), Some("/"));

    for path in ["/admin", "/admin/weekly-report/3", "/api/admin/users/3/summary"] {
        let response = http()
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), Some("/"), "{path}");
    }
}

#[tokio::test]
async fn http_expired_token_signs_out() {
    let backend = MockServer::start_async().await;
    mock_login(&backend, "old-token", "employee").await;
    backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/tracking-status");
            then.status(200).json_body(json!({ "is_tracking": false }));
        })
        .await;
    backend
        .mock_async(|when, then| {
            when.method(GET).path("/api/activities");
            then.status(401).json_body(json!({ "detail": "Token expired" }));
        })
        .await;
    let server = spawn_server(&backend).await;
    login(&server).await;

    let response = http()
        .get(format!("{}/?date=2026-01-05", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let summary = http()
        .get(format!("{}/api/summary", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&summary), Some("/login"));
}

#[tokio::test]
async fn http_rejected_login_shows_detail() {
    let backend = MockServer::start_async().await;
    backend
        .mock_async(|when, then| {
            when.method(POST).path("/api/login");
            then.status(400)
                .json_body(json!({ "detail": "Invalid email or password" }));
        })
        .await;
    let server = spawn_server(&backend).await;

    let response = login(&server).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();
    assert!(page.contains("Invalid email or password"));

    let home = http().get(format!("{}/", server.base_url)).send().await.unwrap();
    assert_eq!(location(&home), Some("/login"));
}
