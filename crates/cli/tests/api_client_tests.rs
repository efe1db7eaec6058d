#[path = "../src/api_client.rs"]
#[allow(dead_code)] // Some methods are used by the binary but not by tests
mod api_client;

use api_client::{ApiClient, UploadRequest};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::json;
use std::net::TcpListener;

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn touch_record(record: &api_client::FileRecord) {
    let _ = (
        record.id,
        record.owner_id,
        &record.name,
        &record.kind,
        record.is_public,
        record.parent_id,
    );
}

#[tokio::test]
async fn api_client_success_paths() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let token = "secret-token";

    let file_response = json!({
        "id": 7,
        "ownerId": 1,
        "name": "notes.txt",
        "type": "file",
        "isPublic": false,
        "parentId": 0
    });

    server.mock(|when, then| {
        when.method(POST).path("/users").json_body(json!({
            "email": "alice@example.com",
            "password": "hunter2"
        }));
        then.status(201)
            .json_body(json!({ "id": 1, "email": "alice@example.com" }));
    });

    server.mock(|when, then| {
        when.method(GET).path("/connect").header(
            "authorization",
            format!("Basic {}", STANDARD.encode("alice@example.com:hunter2")),
        );
        then.status(200).json_body(json!({ "token": token }));
    });

    server.mock(|when, then| {
        when.method(GET).path("/users/me").header("x-token", token);
        then.status(200)
            .json_body(json!({ "id": 1, "email": "alice@example.com" }));
    });

    server.mock(|when, then| {
        when.method(POST)
            .path("/files")
            .header("x-token", token)
            .json_body(json!({
                "name": "notes.txt",
                "type": "file",
                "data": STANDARD.encode("hello"),
                "parentId": 0,
                "isPublic": false
            }));
        then.status(201).json_body(file_response.clone());
    });

    server.mock(|when, then| {
        when.method(GET).path("/files/7").header("x-token", token);
        then.status(200).json_body(file_response.clone());
    });

    server.mock(|when, then| {
        when.method(GET)
            .path("/files")
            .query_param("parentId", "0")
            .query_param("page", "2")
            .header("x-token", token);
        then.status(200).json_body(json!([file_response.clone()]));
    });

    server.mock(|when, then| {
        when.method(GET)
            .path("/files/7/data")
            .header("x-token", token);
        then.status(200).body("hello");
    });

    server.mock(|when, then| {
        when.method(GET).path("/disconnect").header("x-token", token);
        then.status(204);
    });

    server.mock(|when, then| {
        when.method(GET).path("/status");
        then.status(200)
            .json_body(json!({ "db": true, "sessions": true, "storage": true }));
    });

    server.mock(|when, then| {
        when.method(GET).path("/stats");
        then.status(200).json_body(json!({ "users": 1, "files": 1 }));
    });

    let anon = ApiClient::new(&server.base_url(), None).unwrap();

    let user = anon.register("alice@example.com", "hunter2").await.unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.email, "alice@example.com");

    let session = anon.connect("alice@example.com", "hunter2").await.unwrap();
    assert_eq!(session.token, token);

    let client = ApiClient::new(&server.base_url(), Some(token)).unwrap();

    let me = client.whoami().await.unwrap();
    assert_eq!(me.email, "alice@example.com");

    let uploaded = client
        .upload(&UploadRequest {
            name: "notes.txt".to_string(),
            kind: "file".to_string(),
            data: Some(STANDARD.encode("hello")),
            parent_id: 0,
            is_public: false,
        })
        .await
        .unwrap();
    assert_eq!(uploaded.id, 7);
    touch_record(&uploaded);

    let fetched = client.show(7).await.unwrap();
    assert_eq!(fetched.name, "notes.txt");
    touch_record(&fetched);

    let records = client.list(0, 2).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 7);

    let bytes = client.fetch_data(7).await.unwrap();
    assert_eq!(bytes, b"hello");

    client.disconnect().await.unwrap();

    let (healthy, status) = client.status().await.unwrap();
    assert!(healthy);
    assert!(status.db && status.sessions && status.storage);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.users, 1);
    assert_eq!(stats.files, 1);
}

#[tokio::test]
async fn folder_uploads_omit_the_data_field() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();

    // Matches only when the body is exactly this object, so a stray
    // "data": null would fail the request.
    server.mock(|when, then| {
        when.method(POST).path("/files").json_body(json!({
            "name": "docs",
            "type": "folder",
            "parentId": 0,
            "isPublic": true
        }));
        then.status(201).json_body(json!({
            "id": 3,
            "ownerId": 1,
            "name": "docs",
            "type": "folder",
            "isPublic": true,
            "parentId": 0
        }));
    });

    let client = ApiClient::new(&server.base_url(), Some("secret-token")).unwrap();
    let record = client
        .upload(&UploadRequest {
            name: "docs".to_string(),
            kind: "folder".to_string(),
            data: None,
            parent_id: 0,
            is_public: true,
        })
        .await
        .unwrap();

    assert_eq!(record.kind, "folder");
}

#[tokio::test]
async fn status_reports_degraded_stores() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/status");
        then.status(503)
            .json_body(json!({ "db": true, "sessions": true, "storage": false }));
    });

    let client = ApiClient::new(&server.base_url(), None).unwrap();
    let (healthy, status) = client.status().await.unwrap();

    assert!(!healthy);
    assert!(status.db);
    assert!(!status.storage);
}

#[tokio::test]
async fn api_client_renders_error_envelopes() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/files");
        then.status(400).json_body(json!({
            "code": "missing_name",
            "message": "file name is required"
        }));
    });

    server.mock(|when, then| {
        when.method(GET).path("/files/1/data");
        then.status(500).body("boom");
    });

    let client = ApiClient::new(&server.base_url(), Some("secret-token")).unwrap();

    let err = client
        .upload(&UploadRequest {
            name: String::new(),
            kind: "file".to_string(),
            data: None,
            parent_id: 0,
            is_public: false,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("API error (400"));
    assert!(err.to_string().contains("file name is required"));
    assert!(err.to_string().contains("missing_name"));

    // Bodies that are not an error envelope are passed through as-is.
    let err = client.fetch_data(1).await.unwrap_err();
    assert!(err.to_string().contains("API error (500"));
    assert!(err.to_string().contains("boom"));
}
