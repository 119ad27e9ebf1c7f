use quiz_core::model::{Difficulty, QuizSettings};

use super::test_harness::{Stage, ViewHarness, setup_handle_harness};

async fn settle(harness: &mut ViewHarness) -> String {
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    harness.render()
}

#[tokio::test(flavor = "current_thread")]
async fn generate_starts_the_quiz() {
    let mut harness = setup_handle_harness(Stage::Setup, false, |handle, quiz| {
        let settings = QuizSettings::new("Networks", Difficulty::Easy, false).expect("settings");
        handle.generate(quiz, settings);
    });
    let html = settle(&mut harness).await;
    assert!(html.contains("phase: active"), "quiz not started in {html}");
    assert!(html.contains("pending: false"), "request still pending in {html}");
    assert!(!html.contains("error:"), "unexpected error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn generate_outside_setup_reports_without_request() {
    let mut harness = setup_handle_harness(Stage::Landing, false, |handle, quiz| {
        let settings = QuizSettings::new("Networks", Difficulty::Easy, false).expect("settings");
        handle.generate(quiz, settings);
    });
    let html = settle(&mut harness).await;
    assert!(html.contains("phase: landing"), "phase changed in {html}");
    assert!(html.contains("pending: false"), "request issued in {html}");
    assert!(html.contains("error:"), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn submit_scores_and_opens_review() {
    let mut harness = setup_handle_harness(Stage::Active, true, |handle, quiz| {
        handle.submit(quiz, true);
    });
    let html = settle(&mut harness).await;
    assert!(html.contains("phase: reviewing"), "quiz not scored in {html}");
    assert!(html.contains("pending: false"), "request still pending in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn failed_scoring_shows_message_and_stays_active() {
    let mut harness = setup_handle_harness(Stage::Active, false, |handle, quiz| {
        handle.submit(quiz, true);
    });
    let html = settle(&mut harness).await;
    assert!(html.contains("phase: active"), "left the quiz in {html}");
    assert!(html.contains("pending: false"), "request still pending in {html}");
    assert!(html.contains("error: Failed to score quiz."), "missing message in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unconfirmed_submit_asks_before_scoring() {
    let mut harness = setup_handle_harness(Stage::Active, true, |handle, quiz| {
        handle.submit(quiz, false);
    });
    let html = settle(&mut harness).await;
    assert!(html.contains("confirm: 1"), "missing confirmation in {html}");
    assert!(html.contains("phase: active"), "scored without confirmation in {html}");
    assert!(html.contains("pending: false"), "request issued in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn score_arriving_after_going_home_is_dropped() {
    let mut harness = setup_handle_harness(Stage::Active, true, |handle, quiz| {
        handle.submit(quiz, true);
        handle.go_home();
    });
    let html = settle(&mut harness).await;
    assert!(html.contains("phase: landing"), "stale score applied in {html}");
    assert!(html.contains("pending: false"), "request still pending in {html}");
    assert!(!html.contains("error:"), "stale result reported in {html}");
}
