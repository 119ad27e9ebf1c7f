use dioxus::prelude::*;

use crate::context::AppContext;
use crate::vm::AnalyticsVm;

use super::state::QuizHandle;

#[component]
pub fn AnalyticsView() -> Element {
    let ctx = use_context::<AppContext>();
    let handle = use_context::<QuizHandle>();
    // Chart rasters are encoded once per scored session.
    let vm = use_memo(move || AnalyticsVm::from_session(&handle.session.read()));

    let Some(vm) = vm.read().clone() else {
        return rsx! {};
    };
    let reports = ctx.reports();

    rsx! {
        div { class: "page",
            div { class: "card",
                h2 { "Your Results" }
                p { id: "score-summary", "{vm.score_text}" }
                p { id: "time-taken", "{vm.time_text}" }
                p { id: "accuracy", "{vm.accuracy_text}" }
                div { class: "metrics",
                    span { "Correct: {vm.correct}" }
                    span { "Wrong: {vm.wrong}" }
                    span { "Total: {vm.total}" }
                }
            }
            if !vm.charts.is_empty() {
                div { class: "card charts",
                    for chart in vm.charts.iter().cloned() {
                        img { key: "{chart.alt}", src: "{chart.src}", alt: "{chart.alt}" }
                    }
                }
            }
            div { class: "card",
                h3 { "Question Review" }
                ol { class: "review-list",
                    for (index, row) in vm.review.iter().cloned().enumerate() {
                        li { key: "{index}", class: "review-item",
                            div { class: "review-question", "{row.question_line}" }
                            div { class: "review-answer",
                                span { class: "{row.tone}", "{row.your_answer_line}" }
                            }
                            div { class: "review-answer",
                                span { "{row.correct_answer_line}" }
                            }
                        }
                    }
                }
            }
            div { class: "card",
                button {
                    id: "analytics-download",
                    class: "btn",
                    onclick: move |_| handle.download(reports.clone()),
                    "Download PDF"
                }
                button {
                    id: "analytics-retake",
                    class: "btn secondary",
                    onclick: move |_| handle.retake(),
                    "Retake Quiz"
                }
            }
        }
    }
}
