use super::test_harness::{Stage, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn landing_view_smoke_renders_start() {
    let mut harness = setup_view_harness(Stage::Landing);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
    assert!(html.contains("Home"), "missing nav in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn setup_view_smoke_renders_form() {
    let mut harness = setup_view_harness(Stage::Setup);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Quiz Setup"), "missing title in {html}");
    assert!(html.contains("General Knowledge"), "missing default category in {html}");
    for label in ["Easy", "Medium", "Hard"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
    assert!(html.contains("Generate Quiz"), "missing generate in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_questions_and_header() {
    let mut harness = setup_view_harness(Stage::Active);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Category: Networks"), "missing category in {html}");
    assert!(html.contains("Difficulty: Medium"), "missing difficulty in {html}");
    assert!(html.contains("1. Which layer does TCP belong to?"), "missing question in {html}");
    assert!(html.contains("Host names"), "missing option in {html}");
    assert!(html.contains("Answered 1 of 2"), "missing progress in {html}");
    assert!(html.contains("Submit Quiz"), "missing submit in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn analytics_view_smoke_renders_results() {
    let mut harness = setup_view_harness(Stage::Reviewing);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("You scored 1 out of 2 (50.00%)."), "missing score in {html}");
    assert!(html.contains("Accuracy: 50.00%."), "missing accuracy in {html}");
    assert!(html.contains("Question Review"), "missing review in {html}");
    assert!(html.contains("Your answer: Not answered"), "missing blank answer in {html}");
    assert!(html.contains("Correct answer: Host names"), "missing correct answer in {html}");
    assert!(html.contains("data:image/png;base64,"), "missing chart image in {html}");
    assert!(html.contains("Download PDF"), "missing download in {html}");
}
