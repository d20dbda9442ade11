use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::Role;
use crate::routes::app;
use crate::state::test_helpers::{seed_user, test_app_state_with_blobs};
use crate::storage::MemoryBlobStore;

const BOUNDARY: &str = "resovista-test-boundary";

fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match file_name {
            Some(file_name) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                ));
                body.push_str("Content-Type: text/plain\r\n\r\n");
            }
            None => body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn upload_request(token: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/make-server-66a01e1b/documents/upload")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn upload_list_delete() {
    let blobs = Arc::new(MemoryBlobStore::new("docs"));
    let state = test_app_state_with_blobs(blobs.clone());
    let (owner, token) = seed_user(&state, "tara", Role::Teacher).await;
    let app = app(state);

    let body = multipart_body(&[
        ("title", None, "Week 1 notes"),
        ("category", None, "notes"),
        ("file", Some("notes.txt"), "hello world"),
    ]);
    let response = app.clone().oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let document = json_body(response).await["document"].clone();
    assert_eq!(document["title"], "Week 1 notes");
    assert_eq!(document["fileName"], "notes.txt");
    assert_eq!(document["fileSize"], 11);
    let path = document["storagePath"].as_str().unwrap();
    assert!(path.starts_with(&format!("{}/", owner.id)));
    assert!(blobs.get(path).await.is_some());

    let list = Request::builder()
        .uri("/make-server-66a01e1b/documents")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let listed = json_body(app.clone().oneshot(list).await.unwrap()).await;
    assert_eq!(listed["documents"].as_array().unwrap().len(), 1);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/make-server-66a01e1b/documents/{}", document["id"].as_str().unwrap()))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(blobs.is_empty().await);
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let state = test_app_state_with_blobs(Arc::new(MemoryBlobStore::new("docs")));
    let (_, token) = seed_user(&state, "tara", Role::Teacher).await;
    let app = app(state);

    let body = multipart_body(&[("title", None, "No attachment"), ("file", Some(""), "")]);
    let response = app.oneshot(upload_request(&token, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No file provided");
}

#[tokio::test]
async fn upload_requires_multipart() {
    let state = test_app_state_with_blobs(Arc::new(MemoryBlobStore::new("docs")));
    let (_, token) = seed_user(&state, "tara", Role::Teacher).await;
    let app = app(state);

    let request = Request::builder()
        .method("POST")
        .uri("/make-server-66a01e1b/documents/upload")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}
