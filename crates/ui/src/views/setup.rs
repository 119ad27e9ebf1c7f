use dioxus::prelude::*;

use quiz_core::model::Difficulty;

use crate::context::AppContext;
use crate::vm::SetupForm;

use super::state::QuizHandle;

#[component]
pub fn SetupView() -> Element {
    let ctx = use_context::<AppContext>();
    let handle = use_context::<QuizHandle>();
    let mut form = use_signal(SetupForm::default);
    let pending = handle.session.read().pending().is_some();

    let on_generate = move |_| {
        let mut error = handle.error;
        match form.read().to_settings() {
            Ok(settings) => handle.generate(ctx.quiz(), settings),
            Err(err) => error.set(Some(err)),
        }
    };

    let current = form.read().clone();

    rsx! {
        div { class: "page",
            div { class: "card",
                h2 { "Quiz Setup" }
                label { r#for: "setup-category", "Category" }
                input {
                    id: "setup-category",
                    r#type: "text",
                    value: "{current.category}",
                    oninput: move |evt| form.write().category = evt.value(),
                }
                label { r#for: "setup-difficulty", "Difficulty" }
                select {
                    id: "setup-difficulty",
                    value: "{current.difficulty.as_str()}",
                    onchange: move |evt| {
                        if let Ok(difficulty) = evt.value().parse::<Difficulty>() {
                            form.write().difficulty = difficulty;
                        }
                    },
                    for difficulty in Difficulty::ALL {
                        option {
                            key: "{difficulty.as_str()}",
                            value: "{difficulty.as_str()}",
                            selected: difficulty == current.difficulty,
                            "{difficulty.label()}"
                        }
                    }
                }
                label {
                    input {
                        id: "setup-use-ai",
                        r#type: "checkbox",
                        checked: current.use_ai,
                        onchange: move |evt| form.write().use_ai = evt.checked(),
                    }
                    " Use AI-generated questions"
                }
                div {
                    button {
                        id: "setup-generate",
                        class: "btn",
                        disabled: pending,
                        onclick: on_generate,
                        if pending { "Generating..." } else { "Generate Quiz" }
                    }
                }
            }
        }
    }
}
