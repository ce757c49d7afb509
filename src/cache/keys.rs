//! Structured cache keys.
//!
//! A key is a resource tag plus its normalized filter record, so the
//! invalidation rules stay type-checkable instead of living in ad hoc
//! string concatenation.

use strum::EnumIter;

use crate::models::{KardexFilter, MovimientoFilter, ProductoFilter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Productos(ProductoFilter),
    Producto(i64),
    Bodegas { solo_activas: bool },
    Bodega(i64),
    StockProducto(i64),
    StockBodega(i64),
    Alertas,
    Movimientos(MovimientoFilter),
    Kardex { producto_id: i64, filtro: KardexFilter },
}

/// Invalidation granularity. Every key belongs to exactly one scope;
/// mutations invalidate whole scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum QueryScope {
    Productos,
    Bodegas,
    Stock,
    Movimientos,
    Alertas,
    Kardex,
}

impl QueryKey {
    pub fn scope(&self) -> QueryScope {
        match self {
            QueryKey::Productos(_) | QueryKey::Producto(_) => QueryScope::Productos,
            QueryKey::Bodegas { .. } | QueryKey::Bodega(_) => QueryScope::Bodegas,
            QueryKey::StockProducto(_) | QueryKey::StockBodega(_) => QueryScope::Stock,
            QueryKey::Movimientos(_) => QueryScope::Movimientos,
            QueryKey::Alertas => QueryScope::Alertas,
            QueryKey::Kardex { .. } => QueryScope::Kardex,
        }
    }
}
