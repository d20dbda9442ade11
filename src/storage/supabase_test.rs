use super::*;

fn store() -> SupabaseStorage {
    let config = SupabaseConfig { url: "https://abc.supabase.co".into(), service_role_key: "srk".into() };
    let timeouts = HttpTimeouts { request: Duration::from_secs(5), connect: Duration::from_secs(1) };
    SupabaseStorage::new(&config, "make-66a01e1b-documents", timeouts).unwrap()
}

#[test]
fn object_url_encodes_segments() {
    let url = store().object_url(&["object"], "u1/1700-lab report.pdf").unwrap();
    assert_eq!(
        url.as_str(),
        "https://abc.supabase.co/storage/v1/object/make-66a01e1b-documents/u1/1700-lab%20report.pdf"
    );
}

#[test]
fn object_url_for_signing() {
    let url = store().object_url(&["object", "sign"], "u1/a.png").unwrap();
    assert_eq!(url.path(), "/storage/v1/object/sign/make-66a01e1b-documents/u1/a.png");
}

#[test]
fn bucket_listed_matches_by_name() {
    let body = r#"[{"id": "avatars", "name": "avatars"}, {"id": "docs", "name": "docs", "public": false}]"#;
    assert!(bucket_listed(body, "docs").unwrap());
    assert!(!bucket_listed(body, "missing").unwrap());
    assert!(!bucket_listed("[]", "docs").unwrap());
}

#[test]
fn bucket_listed_rejects_non_array() {
    assert!(matches!(bucket_listed(r#"{"error": "nope"}"#, "docs"), Err(BlobError::Transport(_))));
}

#[test]
fn parse_signed_url_makes_relative_absolute() {
    let body = r#"{"signedURL": "/object/sign/docs/u1/a.png?token=xyz"}"#;
    assert_eq!(
        parse_signed_url("https://abc.supabase.co", body).unwrap(),
        "https://abc.supabase.co/storage/v1/object/sign/docs/u1/a.png?token=xyz"
    );
}

#[test]
fn parse_signed_url_keeps_absolute() {
    let body = r#"{"signedUrl": "https://cdn.example/x?token=1"}"#;
    assert_eq!(parse_signed_url("https://abc.supabase.co", body).unwrap(), "https://cdn.example/x?token=1");
}
