//! Integration tests for the hosted-asset manage flow: selection toggling,
//! single deletes, and the bulk delete endpoint.

mod common;

use std::sync::Arc;

use adboard_console::AssetManager;
use common::{asset, FakeBackend};

#[tokio::test]
async fn load_replaces_the_list_and_drops_stale_selection() {
    let api = Arc::new(FakeBackend::default());
    api.set_assets(vec![asset("ads/one"), asset("ads/two")]);

    let mut manager = AssetManager::new(Arc::clone(&api));
    assert_eq!(manager.load().await.unwrap(), 2);
    manager.toggle_select("ads/one");
    assert!(manager.is_selected("ads/one"));

    api.set_assets(vec![asset("ads/three")]);
    assert_eq!(manager.load().await.unwrap(), 1);
    assert!(manager.selected().is_empty());
    assert_eq!(manager.images()[0].public_id, "ads/three");
}

#[tokio::test]
async fn select_all_toggles_between_everything_and_nothing() {
    let api = Arc::new(FakeBackend::default());
    api.set_assets(vec![asset("ads/one"), asset("ads/two"), asset("ads/three")]);

    let mut manager = AssetManager::new(Arc::clone(&api));
    manager.load().await.unwrap();

    manager.toggle_select("ads/two");
    manager.toggle_select_all();
    assert_eq!(manager.selected().len(), 3);

    manager.toggle_select_all();
    assert!(manager.selected().is_empty());
}

#[tokio::test]
async fn deleting_one_asset_removes_its_row_and_selection() {
    let api = Arc::new(FakeBackend::default());
    api.set_assets(vec![asset("ads/one"), asset("ads/two")]);

    let mut manager = AssetManager::new(Arc::clone(&api));
    manager.load().await.unwrap();
    manager.toggle_select("ads/one");

    manager.delete("ads/one").await.unwrap();
    assert_eq!(
        api.deleted_assets.lock().unwrap().as_slice(),
        ["ads/one".to_string()]
    );
    assert_eq!(manager.images().len(), 1);
    assert!(!manager.is_selected("ads/one"));
}

#[tokio::test]
async fn bulk_delete_sends_one_request_and_clears_the_selection() {
    let api = Arc::new(FakeBackend::default());
    api.set_assets(vec![asset("ads/one"), asset("ads/two"), asset("ads/three")]);

    let mut manager = AssetManager::new(Arc::clone(&api));
    manager.load().await.unwrap();
    manager.toggle_select("ads/one");
    manager.toggle_select("ads/three");

    assert_eq!(manager.delete_selected().await.unwrap(), 2);

    let bulk = api.bulk_deletes.lock().unwrap();
    assert_eq!(bulk.len(), 1);
    assert_eq!(bulk[0], ["ads/one".to_string(), "ads/three".to_string()]);
    drop(bulk);

    assert!(manager.selected().is_empty());
    assert_eq!(manager.images().len(), 1);
    assert_eq!(manager.images()[0].public_id, "ads/two");

    // Nothing selected: no request at all.
    assert_eq!(manager.delete_selected().await.unwrap(), 0);
    assert_eq!(api.bulk_deletes.lock().unwrap().len(), 1);
}
