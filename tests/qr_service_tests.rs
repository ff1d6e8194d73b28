//! QR issuance, scan recording and stats against a real SQLite database

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
};
use tokio::task::JoinSet;

use linkfolio::services::{
    DEFAULT_QR_THEME, ProfileService, QR_ID_LENGTH, QrService, RECENT_SCANS_LIMIT,
};
use linkfolio::storage::ScanMetadata;
use migration::entities::{qr_code, qr_scan};

fn scan_meta(ua: &str) -> ScanMetadata {
    ScanMetadata {
        ip_hash: "abc123".to_string(),
        user_agent: ua.to_string(),
        device: "desktop".to_string(),
        browser: "Chrome".to_string(),
        os: "Windows".to_string(),
        country: None,
        referrer: None,
    }
}

#[tokio::test]
async fn test_create_qr_defaults() {
    let env = common::setup_storage("qr_create").await;
    let profiles = ProfileService::new(env.storage.clone(), "http://localhost:8080");
    let qr = QrService::new(env.storage.clone(), "http://localhost:8080/");

    let profile = profiles.get_profile().await.unwrap();
    let code = qr
        .create_qr(&profile.id, Some(String::new()), None)
        .await
        .unwrap();

    assert_eq!(code.qr_id.len(), QR_ID_LENGTH);
    assert!(code.is_active);
    assert_eq!(code.total_scans, 0);
    assert_eq!(code.qr_theme, DEFAULT_QR_THEME);
    assert!(code.qr_code_url.is_none());
    assert_eq!(
        qr.qr_url(&code.qr_id),
        format!("http://localhost:8080/qr/{}", code.qr_id)
    );
}

#[tokio::test]
async fn test_regenerate_leaves_exactly_one_active() {
    let env = common::setup_storage("qr_regenerate").await;
    let profiles = ProfileService::new(env.storage.clone(), "http://localhost:8080");
    let qr = QrService::new(env.storage.clone(), "http://localhost:8080");

    let profile = profiles.get_profile().await.unwrap();
    let first = qr.create_qr(&profile.id, None, None).await.unwrap();
    let _second = qr.create_qr(&profile.id, None, None).await.unwrap();
    let latest = qr
        .regenerate_qr(&profile.id, None, Some("dark".to_string()))
        .await
        .unwrap();

    let active = qr_code::Entity::find()
        .filter(qr_code::Column::ProfileId.eq(profile.id.as_str()))
        .filter(qr_code::Column::IsActive.eq(true))
        .all(env.storage.get_db())
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, latest.id);
    assert_eq!(latest.qr_theme, "dark");

    // 旧码保留，只是失效
    let old = qr.get_qr_by_qr_id(&first.qr_id).await.unwrap().unwrap();
    assert!(!old.is_active);

    let current = qr.get_active_qr(&profile.id).await.unwrap().unwrap();
    assert_eq!(current.qr.id, latest.id);
    assert!(current.scans.is_empty());
}

#[tokio::test]
async fn test_record_scan_increments_counter() {
    let env = common::setup_storage("qr_scans").await;
    let profiles = ProfileService::new(env.storage.clone(), "http://localhost:8080");
    let qr = QrService::new(env.storage.clone(), "http://localhost:8080");

    let profile = profiles.get_profile().await.unwrap();
    let code = qr.create_qr(&profile.id, None, None).await.unwrap();

    let n = 12;
    for i in 0..n {
        let scan = qr
            .record_scan(&code.id, scan_meta(&format!("agent-{}", i)))
            .await
            .unwrap();
        assert_eq!(scan.qr_code_id, code.id);
        assert_eq!(scan.session_id.len(), 16);
    }

    let stored = qr.get_qr_by_id(&code.id).await.unwrap().unwrap();
    assert_eq!(stored.total_scans, n);

    let with_scans = qr.get_active_qr(&profile.id).await.unwrap().unwrap();
    assert_eq!(with_scans.scans.len() as u64, RECENT_SCANS_LIMIT);
    // 最新的在前
    assert_eq!(with_scans.scans[0].user_agent, "agent-11");
}

#[tokio::test]
async fn test_stats_today_and_week() {
    let env = common::setup_storage("qr_stats").await;
    let profiles = ProfileService::new(env.storage.clone(), "http://localhost:8080");
    let qr = QrService::new(env.storage.clone(), "http://localhost:8080");

    let profile = profiles.get_profile().await.unwrap();
    let code = qr.create_qr(&profile.id, None, None).await.unwrap();

    let mut scan_ids = Vec::new();
    for _ in 0..8 {
        scan_ids.push(qr.record_scan(&code.id, scan_meta("ua")).await.unwrap().id);
    }

    // 5 条移到前几天（仍在 7 天内）
    for (i, id) in scan_ids.iter().take(5).enumerate() {
        let model = qr_scan::Entity::find_by_id(*id)
            .one(env.storage.get_db())
            .await
            .unwrap()
            .unwrap();
        let mut active: qr_scan::ActiveModel = model.into();
        active.created_at = Set(Utc::now() - Duration::days(2 + (i as i64 % 3)));
        active.update(env.storage.get_db()).await.unwrap();
    }

    let stats = qr.get_qr_stats(&code.id).await.unwrap().unwrap();
    assert_eq!(stats.scans_today, 3);
    assert_eq!(stats.scans_this_week, 8);
    assert_eq!(stats.total_scans, 8);
}

#[tokio::test]
async fn test_stats_unknown_qr() {
    let env = common::setup_storage("qr_stats_unknown").await;
    let qr = QrService::new(env.storage.clone(), "http://localhost:8080");
    assert!(qr.get_qr_stats("missing").await.unwrap().is_none());
    assert!(qr.get_qr_by_qr_id("unknown999").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_scans_are_all_counted() {
    let env = common::setup_storage("qr_concurrent").await;
    let profiles = ProfileService::new(env.storage.clone(), "http://localhost:8080");
    let qr = Arc::new(QrService::new(env.storage.clone(), "http://localhost:8080"));

    let profile = profiles.get_profile().await.unwrap();
    let code = qr.create_qr(&profile.id, None, None).await.unwrap();

    let n = 50;
    let mut tasks = JoinSet::new();
    for i in 0..n {
        let qr = qr.clone();
        let id = code.id.clone();
        tasks.spawn(async move { qr.record_scan(&id, scan_meta(&format!("agent-{}", i))).await });
    }
    while let Some(res) = tasks.join_next().await {
        res.unwrap().unwrap();
    }

    let rows = qr_scan::Entity::find()
        .filter(qr_scan::Column::QrCodeId.eq(code.id.as_str()))
        .count(env.storage.get_db())
        .await
        .unwrap();
    assert_eq!(rows, n as u64);

    let stored = qr.get_qr_by_id(&code.id).await.unwrap().unwrap();
    assert_eq!(stored.total_scans, n);
}

#[tokio::test]
async fn test_week_window_excludes_older_scans() {
    let env = common::setup_storage("qr_stats_window").await;
    let profiles = ProfileService::new(env.storage.clone(), "http://localhost:8080");
    let qr = QrService::new(env.storage.clone(), "http://localhost:8080");

    let profile = profiles.get_profile().await.unwrap();
    let code = qr.create_qr(&profile.id, None, None).await.unwrap();

    let mut scan_ids = Vec::new();
    for _ in 0..4 {
        scan_ids.push(qr.record_scan(&code.id, scan_meta("ua")).await.unwrap().id);
    }

    // 8 天前与 30 天前各一条，落在 7 天窗口外
    for (id, days) in scan_ids.iter().zip([8i64, 30]) {
        let model = qr_scan::Entity::find_by_id(*id)
            .one(env.storage.get_db())
            .await
            .unwrap()
            .unwrap();
        let mut active: qr_scan::ActiveModel = model.into();
        active.created_at = Set(Utc::now() - Duration::days(days));
        active.update(env.storage.get_db()).await.unwrap();
    }

    let stats = qr.get_qr_stats(&code.id).await.unwrap().unwrap();
    assert_eq!(stats.total_scans, 4);
    assert_eq!(stats.scans_this_week, 2);
    assert_eq!(stats.scans_today, 2);
}
