//! Optimistic staging for stock adjustments.
//!
//! An adjustment is patched into every cached projection of the product
//! synchronously, before the network call resolves, so the UI reflects
//! it immediately. The staged state then takes exactly one of two exits:
//! `confirm` (discard snapshots, invalidate dependent scopes so server
//! truth is refetched) or `roll_back` (restore snapshots verbatim). The
//! optimistic value is a latency hack, never a source of truth.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{CachedValue, QueryCache, QueryKey, QueryScope};
use crate::models::AjusteInventario;

/// Scopes derived from the same underlying stock change; every
/// successful stock mutation invalidates all four.
pub const STOCK_DEPENDENT_SCOPES: [QueryScope; 4] = [
    QueryScope::Productos,
    QueryScope::Stock,
    QueryScope::Movimientos,
    QueryScope::Alertas,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Staged,
    Confirmed,
    RolledBack,
}

/// A staged adjustment holding the rollback snapshots. Dropping one that
/// was never confirmed rolls it back, so a panicking caller cannot leave
/// speculative values behind.
pub struct StagedAdjustment {
    cache: Arc<QueryCache>,
    snapshots: Vec<(QueryKey, Option<CachedValue>)>,
    phase: MutationPhase,
}

/// Snapshots the product's cached projections and applies the signed
/// delta to each, synchronously.
pub fn stage_adjustment(cache: &Arc<QueryCache>, ajuste: &AjusteInventario) -> StagedAdjustment {
    let mut keys = cache.keys_in_scope(QueryScope::Productos);
    keys.push(QueryKey::StockProducto(ajuste.producto_id));

    let snapshots: Vec<_> = keys
        .iter()
        .map(|key| (key.clone(), cache.snapshot(key)))
        .collect();

    for key in &keys {
        cache.mutate(key, |value| {
            apply_delta(value, ajuste.producto_id, ajuste.bodega_id, ajuste.cantidad)
        });
    }

    debug!(
        producto_id = ajuste.producto_id,
        bodega_id = ajuste.bodega_id,
        cantidad = ajuste.cantidad,
        snapshots = snapshots.len(),
        "adjustment staged"
    );

    StagedAdjustment {
        cache: Arc::clone(cache),
        snapshots,
        phase: MutationPhase::Staged,
    }
}

impl StagedAdjustment {
    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// Server accepted the mutation: the snapshots are obsolete and every
    /// dependent scope is invalidated so the next read pulls server truth.
    pub fn confirm(mut self) -> MutationPhase {
        self.phase = MutationPhase::Confirmed;
        self.snapshots.clear();
        for scope in STOCK_DEPENDENT_SCOPES {
            self.cache.invalidate_scope(scope);
        }
        MutationPhase::Confirmed
    }

    /// Server rejected the mutation: restore the pre-stage state
    /// bit-identically.
    pub fn roll_back(mut self) -> MutationPhase {
        self.restore_snapshots();
        self.phase = MutationPhase::RolledBack;
        MutationPhase::RolledBack
    }

    fn restore_snapshots(&mut self) {
        for (key, snapshot) in self.snapshots.drain(..) {
            self.cache.restore(key, snapshot);
        }
    }
}

impl Drop for StagedAdjustment {
    fn drop(&mut self) {
        if self.phase == MutationPhase::Staged {
            warn!("staged adjustment dropped without resolution, rolling back");
            self.restore_snapshots();
        }
    }
}

/// Patches a cached projection of the product in place. Handles both the
/// shapes the cache holds: product lists (arrays of products), a product
/// detail object, and the consolidated stock object.
fn apply_delta(value: &mut Value, producto_id: i64, bodega_id: i64, delta: i64) {
    match value {
        Value::Array(productos) => {
            for producto in productos {
                if producto.get("id").and_then(Value::as_i64) == Some(producto_id) {
                    bump(producto, "stock_actual", delta);
                    bump_bodega_list(producto.get_mut("stocks_bodega"), bodega_id, delta);
                }
            }
        }
        Value::Object(_) => {
            if value.get("id").and_then(Value::as_i64) == Some(producto_id) {
                // Product detail.
                bump(value, "stock_actual", delta);
                bump_bodega_list(value.get_mut("stocks_bodega"), bodega_id, delta);
            } else if value.get("producto_id").and_then(Value::as_i64) == Some(producto_id) {
                // Consolidated stock.
                bump(value, "stock_total", delta);
                bump_bodega_list(value.get_mut("stock_por_bodega"), bodega_id, delta);
            }
        }
        _ => {}
    }
}

fn bump_bodega_list(list: Option<&mut Value>, bodega_id: i64, delta: i64) {
    let Some(Value::Array(stocks)) = list else {
        return;
    };
    for stock in stocks {
        if stock.get("bodega_id").and_then(Value::as_i64) == Some(bodega_id) {
            bump(stock, "cantidad", delta);
        }
    }
}

fn bump(object: &mut Value, field: &str, delta: i64) {
    if let Some(current) = object.get(field).and_then(Value::as_i64) {
        object[field] = Value::from(current + delta);
    }
}
