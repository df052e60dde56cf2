//! HTTP edge of the Linky link shortener.
//!
//! Visitors resolve slugs at `/{slug}`; an operator holding the API key
//! manages links under `/api`. All lifecycle rules live behind
//! [`linky_engine::LinkEngine`]; this crate only translates requests and
//! outcomes.

pub mod app;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use state::AppState;
