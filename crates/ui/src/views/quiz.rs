use dioxus::prelude::*;

use crate::context::AppContext;
use crate::vm::{QuizVm, unanswered_prompt};

use super::state::QuizHandle;

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let handle = use_context::<QuizHandle>();
    let mut timer_label = use_signal(|| handle.session.peek().timer().label());

    // The timer's watch channel outlives restarts, so one subscription is enough.
    use_future(move || {
        let mut rx = handle.session.peek().timer().subscribe();
        async move {
            loop {
                let label = rx.borrow_and_update().clone();
                timer_label.set(label);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    let Some(vm) = QuizVm::from_session(&handle.session.read()) else {
        return rsx! {};
    };
    let confirm = *handle.pending_confirm.read();
    let quiz_for_submit = ctx.quiz();
    let quiz_for_confirm = ctx.quiz();

    rsx! {
        div { class: "page",
            div { class: "card quiz-header",
                span { "{vm.category_label}" }
                span { "{vm.difficulty_label}" }
                span { "{vm.source_label}" }
                span { class: "timer", "{timer_label}" }
            }
            for card in vm.cards.iter().cloned() {
                div { key: "{card.index}", class: "card question",
                    p { class: "question-title", "{card.title}" }
                    for option in card.options.iter().cloned() {
                        label { key: "{option.index}", class: "option",
                            input {
                                r#type: "radio",
                                name: "question-{card.index}",
                                checked: option.selected,
                                onchange: move |_| handle.select(card.index, option.index),
                            }
                            " {option.text}"
                        }
                    }
                }
            }
            if let Some(unanswered) = confirm {
                div { class: "card confirm",
                    p { "{unanswered_prompt(unanswered)}" }
                    button {
                        id: "quiz-confirm-submit",
                        class: "btn",
                        onclick: move |_| handle.submit(quiz_for_confirm.clone(), true),
                        "Submit anyway"
                    }
                    button {
                        id: "quiz-cancel-submit",
                        class: "btn secondary",
                        onclick: move |_| handle.cancel_submit(),
                        "Keep answering"
                    }
                }
            }
            div { class: "card",
                p { class: "notice", "{vm.progress_label()}" }
                button {
                    id: "quiz-submit",
                    class: "btn",
                    disabled: vm.submitting,
                    onclick: move |_| handle.submit(quiz_for_submit.clone(), false),
                    if vm.submitting { "Scoring..." } else { "Submit Quiz" }
                }
            }
        }
    }
}
