use dioxus::prelude::*;

use services::Phase;

use crate::context::AppContext;
use crate::views::{AnalyticsView, LandingView, QuizHandle, QuizView, SetupView};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_signal(|| ctx.new_session());
    let handle = use_context_provider(|| QuizHandle {
        session,
        error: Signal::new(None),
        notice: Signal::new(None),
        pending_confirm: Signal::new(None),
    });
    let mut dark = use_signal(|| false);

    let phase = handle.session.read().phase();
    let error = *handle.error.read();
    let notice = handle.notice.read().clone();
    let root_class = if dark() { "app-root dark" } else { "app-root" };

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Quiz" }

        div { class: "{root_class}",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                header { class: "topbar",
                    button {
                        id: "nav-home",
                        class: "btn secondary",
                        onclick: move |_| handle.go_home(),
                        "Home"
                    }
                    button {
                        id: "theme-toggle",
                        class: "btn secondary",
                        onclick: move |_| dark.set(!dark()),
                        if dark() { "Light" } else { "Dark" }
                    }
                }
                if let Some(err) = error {
                    p { class: "page error", role: "alert", "{err.message()}" }
                }
                if let Some(notice) = notice {
                    p { class: "page notice", "{notice}" }
                }
                match phase {
                    Phase::Landing => rsx! { LandingView {} },
                    Phase::Setup => rsx! { SetupView {} },
                    Phase::Active => rsx! { QuizView {} },
                    Phase::Reviewing => rsx! { AnalyticsView {} },
                }
            }
        }
    }
}
