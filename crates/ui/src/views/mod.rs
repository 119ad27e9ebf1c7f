mod analytics;
mod landing;
mod quiz;
mod setup;
mod state;

#[cfg(test)]
mod handle_flow;
#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use analytics::AnalyticsView;
pub use landing::LandingView;
pub use quiz::QuizView;
pub use setup::SetupView;
pub use state::{QuizHandle, ViewError};
