use super::*;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Item {
    name: String,
    count: u32,
}

#[tokio::test]
async fn typed_round_trip() {
    let store = MemoryKvStore::new();
    let item = Item { name: "chalk".into(), count: 3 };
    store.set_json("item:1", &item).await.unwrap();
    let back: Option<Item> = store.get_json("item:1").await.unwrap();
    assert_eq!(back, Some(item));
}

#[tokio::test]
async fn get_json_reports_codec_error_with_key() {
    let store = MemoryKvStore::new();
    store.set("item:bad", json!({"name": 5})).await.unwrap();
    let err = store.get_json::<Item>("item:bad").await.unwrap_err();
    assert!(matches!(err, KvError::Codec { ref key, .. } if key == "item:bad"));
}

#[tokio::test]
async fn ext_methods_work_through_trait_object() {
    let store: std::sync::Arc<dyn KvStore> = std::sync::Arc::new(MemoryKvStore::new());
    store.set_json("item:1", &Item { name: "x".into(), count: 0 }).await.unwrap();
    store.set("item:2", json!("garbage")).await.unwrap();
    let back: Option<Item> = store.get_json("item:1").await.unwrap();
    assert_eq!(back.map(|i| i.name).as_deref(), Some("x"));
    assert_eq!(store.get_by_prefix("item:").await.unwrap().len(), 2);
}
