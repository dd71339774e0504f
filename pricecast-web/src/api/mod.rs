//! HTTP API handlers for pricecast-web

pub mod buildinfo;
pub mod health;
pub mod predict;
pub mod products;
pub mod ui;

pub use buildinfo::{get_build_info, BuildInfo};
pub use health::health_routes;
pub use predict::predict;
pub use products::list_products;
pub use ui::{serve_index, submit_form};
