mod common;

use axum::http::Method;
use common::{logged_in_app, MockBackend};
use quiz_admin::models::QuestionPatch;
use quiz_admin::services::NotificationLevel;

struct Fixture {
    backend: MockBackend,
    test_id: i64,
    question_id: i64,
    options: [i64; 3],
}

/// 一套测试、一道题、三个选项，第一个为正确答案
async fn fixture() -> Fixture {
    let backend = MockBackend::start().await;
    let test_id = backend.seed_test("Quiz 1", None);
    let question_id = backend.seed_question(test_id, "2 + 2 = ?");
    let options = [
        backend.seed_option(question_id, "4", true),
        backend.seed_option(question_id, "5", false),
        backend.seed_option(question_id, "22", false),
    ];
    Fixture {
        backend,
        test_id,
        question_id,
        options,
    }
}

#[tokio::test]
async fn loads_test_with_nested_questions_and_options() {
    let fx = fixture().await;
    let (app, _) = logged_in_app(&fx.backend);
    let mut flow = app.test_detail_flow(fx.test_id);

    let test = flow.load().await.unwrap().unwrap();
    let question = test.question(fx.question_id).unwrap();
    assert_eq!(question.options().len(), 3);
    assert_eq!(question.correct_count(), 1);
}

#[tokio::test]
async fn mark_correct_leaves_exactly_one_correct_option() {
    let fx = fixture().await;
    let (app, _) = logged_in_app(&fx.backend);
    let mut flow = app.test_detail_flow(fx.test_id);
    flow.load().await.unwrap();

    let report = flow
        .mark_correct(fx.question_id, fx.options[2])
        .await
        .applied()
        .unwrap();

    // 只有状态需要改变的两个选项发出 PUT
    assert_eq!(report.applied.len(), 2);
    assert!(report.is_complete());
    assert!(report.is_consistent());
    assert_eq!(fx.backend.correct_options(fx.question_id), vec![fx.options[2]]);
    assert_eq!(fx.backend.count_requests(&Method::PUT, "/tests/option"), 2);

    let question = flow.test().unwrap().question(fx.question_id).unwrap();
    assert_eq!(question.correct_count(), 1);
}

#[tokio::test]
async fn mark_correct_on_already_correct_option_sends_nothing() {
    let fx = fixture().await;
    let (app, _) = logged_in_app(&fx.backend);
    let mut flow = app.test_detail_flow(fx.test_id);
    flow.load().await.unwrap();

    let report = flow
        .mark_correct(fx.question_id, fx.options[0])
        .await
        .applied()
        .unwrap();

    assert!(report.applied.is_empty());
    assert_eq!(report.correct_after, Some(1));
    assert_eq!(fx.backend.count_requests(&Method::PUT, "/tests/option"), 0);
}

#[tokio::test]
async fn partial_failure_can_leave_question_without_correct_option() {
    let fx = fixture().await;
    fx.backend.fail_option_updates(fx.options[2]);
    let (app, notifier) = logged_in_app(&fx.backend);
    let mut flow = app.test_detail_flow(fx.test_id);
    flow.load().await.unwrap();

    let report = flow
        .mark_correct(fx.question_id, fx.options[2])
        .await
        .applied()
        .unwrap();

    // 清除旧答案成功、设置新答案失败：题目没有正确选项
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].1, "option update failed");
    assert_eq!(report.correct_after, Some(0));
    assert!(!report.is_consistent());
    assert!(fx.backend.correct_options(fx.question_id).is_empty());

    let notifications = notifier.take();
    assert!(notifications
        .iter()
        .any(|n| n.level == NotificationLevel::Error && n.message == "option update failed"));
    assert_eq!(
        notifications.last().map(|n| n.level),
        Some(NotificationLevel::Warning)
    );
}

#[tokio::test]
async fn mark_correct_rejects_option_of_another_question() {
    let fx = fixture().await;
    let other_question = fx.backend.seed_question(fx.test_id, "3 + 3 = ?");
    let foreign = fx.backend.seed_option(other_question, "6", false);
    let (app, _) = logged_in_app(&fx.backend);
    let mut flow = app.test_detail_flow(fx.test_id);

    let outcome = flow.mark_correct(fx.question_id, foreign).await;

    assert!(!outcome.is_applied());
    assert_eq!(fx.backend.count_requests(&Method::PUT, "/tests/option"), 0);
}

#[tokio::test]
async fn blank_option_text_is_rejected_without_a_request() {
    let fx = fixture().await;
    let (app, notifier) = logged_in_app(&fx.backend);
    let mut flow = app.test_detail_flow(fx.test_id);

    let outcome = flow.edit_option_text(fx.options[1], "   ").await;

    assert!(outcome.rejection().is_some());
    assert_eq!(notifier.last().unwrap().level, NotificationLevel::Error);
    assert_eq!(fx.backend.count_requests(&Method::PUT, "/tests/option"), 0);
    assert_eq!(fx.backend.option(fx.options[1]).unwrap()["option"], "5");
}

#[tokio::test]
async fn new_option_starts_blank_and_can_be_edited() {
    let fx = fixture().await;
    let (app, _) = logged_in_app(&fx.backend);
    let mut flow = app.test_detail_flow(fx.test_id);
    flow.load().await.unwrap();

    let created = flow
        .add_option(fx.question_id)
        .await
        .applied()
        .flatten()
        .unwrap();
    assert_eq!(created.option, "");
    assert!(!created.is_correct);

    assert!(flow.edit_option_text(created.id, "3").await.is_applied());

    let question = flow.test().unwrap().question(fx.question_id).unwrap();
    assert_eq!(question.options().len(), 4);
    assert!(question.options().iter().any(|o| o.id == created.id && o.option == "3"));
}

#[tokio::test]
async fn question_lifecycle_refetches_detail() {
    let fx = fixture().await;
    let (app, _) = logged_in_app(&fx.backend);
    let mut flow = app.test_detail_flow(fx.test_id);
    flow.load().await.unwrap();

    let created = flow
        .add_question("Capital of France?", None)
        .await
        .applied()
        .flatten()
        .unwrap();
    assert_eq!(created.question_score, 0.0);
    assert_eq!(flow.test().unwrap().questions().len(), 2);

    let patch = QuestionPatch {
        question_score: Some(2.5),
        ..Default::default()
    };
    assert!(flow.update_question(created.id, patch).await.is_applied());
    let question = flow.test().unwrap().question(created.id).unwrap();
    assert_eq!(question.question, "Capital of France?");
    assert_eq!(question.question_score, 2.5);

    assert!(flow.delete_question(created.id).await.is_applied());
    assert!(flow.test().unwrap().question(created.id).is_none());
}

#[tokio::test]
async fn blank_question_text_is_rejected_locally() {
    let fx = fixture().await;
    let (app, _) = logged_in_app(&fx.backend);
    let mut flow = app.test_detail_flow(fx.test_id);

    assert!(!flow.add_question("", Some(1.0)).await.is_applied());
    assert_eq!(fx.backend.count_requests(&Method::POST, "/tests/question"), 0);
}
