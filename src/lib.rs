//! Client-side data layer for the SVT inventory backend.
//!
//! Three pieces stack on top of each other:
//!
//! - typed remote services ([`services`]) that speak the backend's wire
//!   contract verbatim, including its Spanish field names;
//! - a query cache ([`cache`]) with per-resource staleness windows,
//!   stale-while-revalidate reads and scope-level invalidation;
//! - an optimistic mutation controller ([`optimistic`]) that patches
//!   cached stock synchronously and rolls back verbatim on rejection.
//!
//! [`store::InventoryStore`] wires the three together and is the
//! intended entry point:
//!
//! ```no_run
//! use svt_inventory_client::config::ClientConfig;
//! use svt_inventory_client::store::InventoryStore;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("http://localhost:8000");
//! let store = InventoryStore::new(&config)?;
//!
//! store.auth().login("admin@svt.cl", "secret").await?;
//! let stock = store.stock_producto(7).await?;
//! println!("{} unidades", stock.stock_total);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod models;
pub mod optimistic;
pub mod services;
pub mod session;
pub mod store;

pub use errors::ApiError;
pub use store::InventoryStore;
