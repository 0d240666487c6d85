pub mod crawler;
pub mod retry;
pub mod web;

pub use crawler::PageNavigator;
pub use retry::{NavigationState, RetryNavigator};
pub use web::WebDriverNavigator;
