//! 核验与导入流程集成测试
//!
//! 使用内存存储跑通完整流程（无需外部依赖）：
//! - 导入批次后核验
//! - 并发核验同一码只有一次成功
//! - 跨批次的全局唯一

use std::sync::Arc;
use std::time::Duration;

use code_service::service::dto::messages;
use code_service::{
    BatchImportService, CodeRepositoryTrait, CodeStatus, MemoryCodeStore,
    VerificationService, VerifyOutcome, VerifyRequest,
};
use futures::future::join_all;
use verifier_shared::test_utils::{TestDataGenerator, test_code};

const TIMEOUT: Duration = Duration::from_secs(2);

struct Harness {
    store: Arc<MemoryCodeStore>,
    importer: BatchImportService,
    verifier: Arc<VerificationService>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryCodeStore::new());
    Harness {
        importer: BatchImportService::new(store.clone(), store.clone(), TIMEOUT),
        verifier: Arc::new(VerificationService::new(store.clone(), TIMEOUT)),
        store,
    }
}

fn request(code: &str) -> VerifyRequest {
    VerifyRequest::new(code, TestDataGenerator::mobile(), "Amazon")
}

// ==================== 导入 ====================

#[tokio::test]
async fn test_import_then_verify() {
    let h = harness();
    let code = test_code("FLOW");

    let message = h
        .importer
        .import("first batch", &TestDataGenerator::rows([code.clone()]))
        .await;
    assert_eq!(
        message.message.as_deref(),
        Some("1 codes uploaded to \"first batch\"")
    );

    let stored = h.store.find_by_code(&code).await.unwrap().unwrap();
    assert_eq!(stored.status, CodeStatus::Unused);
    assert!(stored.mobile.is_none());

    let outcome = h.verifier.verify(&request(&code)).await;
    assert_eq!(outcome, VerifyOutcome::success(messages::VERIFIED));

    let stored = h.store.find_by_code(&code).await.unwrap().unwrap();
    assert_eq!(stored.status, CodeStatus::Used);
    assert_eq!(stored.mobile.as_deref(), Some(TestDataGenerator::mobile()));
    assert_eq!(stored.purchase_source.as_deref(), Some("Amazon"));
    assert!(stored.verified_at.is_some());
}

#[tokio::test]
async fn test_import_deduplicates_within_batch() {
    let h = harness();
    let rows = TestDataGenerator::rows(["A1", "A1", " a2 "]);

    let report = h.importer.import_batch("March", &rows).await.unwrap();

    assert_eq!(report.inserted_count, 2);
    assert_eq!(report.duplicate_count, 1);
    assert_eq!(h.store.code_count().await, 2);
    assert!(h.store.find_by_code("a2").await.unwrap().is_some());
    assert_eq!(
        h.store.count_codes_in_batch(report.batch_id).await.unwrap(),
        2
    );
}

#[tokio::test]
async fn test_codes_are_unique_across_batches() {
    let h = harness();

    let first = h
        .importer
        .import_batch("first", &TestDataGenerator::rows(["X1", "X2"]))
        .await
        .unwrap();
    let second = h
        .importer
        .import_batch("second", &TestDataGenerator::rows(["X2", "X3"]))
        .await
        .unwrap();

    assert_eq!(second.inserted_count, 1);
    assert_eq!(second.duplicate_count, 1);

    // 已存在的码保留原批次
    let x2 = h.store.find_by_code("X2").await.unwrap().unwrap();
    assert_eq!(x2.batch_id, first.batch_id);
    assert_eq!(h.store.batch_count().await, 2);
}

#[tokio::test]
async fn test_reimport_does_not_reset_used_code() {
    let h = harness();
    h.importer
        .import_batch("first", &TestDataGenerator::rows(["R1"]))
        .await
        .unwrap();
    assert!(h.verifier.verify(&request("R1")).await.is_success());

    let report = h
        .importer
        .import_batch("again", &TestDataGenerator::rows(["R1"]))
        .await
        .unwrap();
    assert_eq!(report.inserted_count, 0);

    let stored = h.store.find_by_code("R1").await.unwrap().unwrap();
    assert_eq!(stored.status, CodeStatus::Used);
}

#[tokio::test]
async fn test_import_order_does_not_change_stored_set() {
    let forward = harness();
    let backward = harness();
    let codes = ["K1", "K2", "K1", "K3", "K2"];

    forward
        .importer
        .import_batch("fwd", &TestDataGenerator::rows(codes))
        .await
        .unwrap();
    backward
        .importer
        .import_batch("bwd", &TestDataGenerator::rows(codes.iter().rev().copied()))
        .await
        .unwrap();

    for code in ["K1", "K2", "K3"] {
        assert!(forward.store.find_by_code(code).await.unwrap().is_some());
        assert!(backward.store.find_by_code(code).await.unwrap().is_some());
    }
    assert_eq!(forward.store.code_count().await, 3);
    assert_eq!(backward.store.code_count().await, 3);
}

#[tokio::test]
async fn test_rows_without_code_are_skipped() {
    let h = harness();
    let rows = vec![
        TestDataGenerator::row_without_code(),
        TestDataGenerator::row("S1"),
        TestDataGenerator::row(4711),
    ];

    let report = h.importer.import_batch("sparse", &rows).await.unwrap();

    assert_eq!(report.inserted_count, 2);
    assert_eq!(report.unparseable_count, 1);
    assert!(h.store.find_by_code("4711").await.unwrap().is_some());
}

// ==================== 核验 ====================

#[tokio::test]
async fn test_nonexistent_and_used_codes_are_indistinguishable() {
    let h = harness();
    h.importer
        .import_batch("b", &TestDataGenerator::rows(["U1"]))
        .await
        .unwrap();
    assert!(h.verifier.verify(&request("U1")).await.is_success());

    let used = h.verifier.verify(&request("U1")).await;
    let missing = h.verifier.verify(&request("NEVER-IMPORTED")).await;

    assert_eq!(used, missing);
    assert_eq!(used, VerifyOutcome::failure(messages::CODE_UNAVAILABLE));
}

#[tokio::test]
async fn test_second_verification_keeps_first_submission() {
    let h = harness();
    h.importer
        .import_batch("b", &TestDataGenerator::rows(["F1"]))
        .await
        .unwrap();

    h.verifier.verify(&request("F1")).await;
    let retry = VerifyRequest::new("F1", "1111111111", "Flipkart");
    assert!(!h.verifier.verify(&retry).await.is_success());

    let stored = h.store.find_by_code("F1").await.unwrap().unwrap();
    assert_eq!(stored.mobile.as_deref(), Some(TestDataGenerator::mobile()));
    assert_eq!(stored.purchase_source.as_deref(), Some("Amazon"));
}

#[tokio::test]
async fn test_invalid_request_leaves_code_unused() {
    let h = harness();
    h.importer
        .import_batch("b", &TestDataGenerator::rows(["V1"]))
        .await
        .unwrap();

    let outcome = h
        .verifier
        .verify(&VerifyRequest::new("V1", "98765", "Amazon"))
        .await;
    assert_eq!(outcome, VerifyOutcome::failure(messages::INVALID_MOBILE));

    let stored = h.store.find_by_code("V1").await.unwrap().unwrap();
    assert_eq!(stored.status, CodeStatus::Unused);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verification_succeeds_once() {
    let h = harness();
    h.importer
        .import_batch("race", &TestDataGenerator::rows(["C1"]))
        .await
        .unwrap();

    let tasks = (0..16).map(|i| {
        let verifier = h.verifier.clone();
        tokio::spawn(async move {
            let req = VerifyRequest::new("C1", format!("98765432{:02}", i), "Store");
            verifier.verify(&req).await
        })
    });

    let outcomes: Vec<VerifyOutcome> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let successes = outcomes.iter().filter(|o| o.is_success()).count();
    assert_eq!(successes, 1);
    assert!(
        outcomes
            .iter()
            .filter(|o| !o.is_success())
            .all(|o| o.message() == messages::CODE_UNAVAILABLE)
    );
}
