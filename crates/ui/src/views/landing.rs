use dioxus::prelude::*;

use super::state::QuizHandle;

#[component]
pub fn LandingView() -> Element {
    let handle = use_context::<QuizHandle>();

    rsx! {
        div { class: "page",
            div { class: "card",
                h1 { "Quiz Time" }
                p { class: "notice",
                    "Ten questions, one timer. Pick a topic and see how you do."
                }
                button {
                    id: "landing-start",
                    class: "btn",
                    onclick: move |_| handle.open_setup(),
                    "Start Quiz"
                }
            }
        }
    }
}
