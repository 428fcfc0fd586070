//! Web server module
//!
//! The browser front end: question form, results, transcript download,
//! plus a small JSON API.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
