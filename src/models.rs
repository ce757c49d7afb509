//! Wire types for the SVT inventory backend.
//!
//! Field names match the backend contract exactly (Spanish snake_case);
//! the client never reshapes payloads. All entities are owned by the
//! backend — these are transient cached projections.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---- products ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producto {
    pub id: i64,
    pub sku: String,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    pub precio_unitario: Decimal,
    #[serde(default)]
    pub proveedor_id: Option<i64>,
    pub stock_minimo: i64,
    pub stock_actual: i64,
    /// Per-bodega breakdown, present on detail and list payloads that
    /// embed it. Optimistic updates patch this alongside `stock_actual`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stocks_bodega: Option<Vec<StockBodega>>,
    #[serde(default)]
    pub fecha_creacion: Option<NaiveDateTime>,
    #[serde(default)]
    pub fecha_actualizacion: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductoCreate {
    pub sku: String,
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    pub precio_unitario: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proveedor_id: Option<i64>,
    pub stock_minimo: i64,
    pub stock_inicial: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_unitario: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proveedor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_minimo: Option<i64>,
}

/// List filter for `GET /productos`. Doubles as the cache-key filter
/// record, so every field must hash stably.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductoFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

// ---- bodegas ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bodega {
    pub id: i64,
    pub codigo: String,
    pub nombre: String,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub encargado: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    pub activa: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodegaCreate {
    pub codigo: String,
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encargado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodegaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encargado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activa: Option<bool>,
}

// ---- stock ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBodega {
    pub producto_id: i64,
    pub bodega_id: i64,
    #[serde(default)]
    pub bodega_nombre: Option<String>,
    /// Invariant: never negative; the server rejects movements that
    /// would take it below zero.
    pub cantidad: i64,
    #[serde(default)]
    pub ubicacion: Option<String>,
}

/// Threshold classification computed server-side from current stock vs.
/// `stock_minimo`. The client displays it and never recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoStock {
    Normal,
    StockBajo,
    SinStock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockConsolidado {
    pub producto_id: i64,
    pub sku: String,
    pub nombre: String,
    pub stock_total: i64,
    pub stock_minimo: i64,
    pub estado: EstadoStock,
    pub stock_por_bodega: Vec<StockBodega>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertaStock {
    pub producto_id: i64,
    pub sku: String,
    pub nombre: String,
    #[serde(default)]
    pub bodega_id: Option<i64>,
    #[serde(default)]
    pub bodega_nombre: Option<String>,
    pub stock_actual: i64,
    pub stock_minimo: i64,
}

// ---- movements / kardex ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoMovimiento {
    Entrada,
    Salida,
    AjustePositivo,
    AjusteNegativo,
    TransferenciaEntrada,
    TransferenciaSalida,
    Inicial,
    InventarioFisico,
}

/// Reason codes recorded on movements. `Otro` doubles as the catch-all
/// for codes this client version does not know yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotivoMovimiento {
    Compra,
    DevolucionCliente,
    AjustePositivo,
    TransferenciaEntrada,
    InventarioInicial,
    Venta,
    DevolucionProveedor,
    AjusteNegativo,
    TransferenciaSalida,
    AjusteStock,
    ConteoFisico,
    ProductoDanado,
    ProductoVencido,
    ErrorSistema,
    RoboPerdida,
    Transferencia,
    InventarioFisico,
    #[serde(other)]
    Otro,
}

impl MotivoMovimiento {
    /// Reasons offered in the manual-adjustment flow.
    pub fn motivos_ajuste() -> &'static [MotivoMovimiento] {
        &[
            MotivoMovimiento::AjusteStock,
            MotivoMovimiento::ConteoFisico,
            MotivoMovimiento::ProductoDanado,
            MotivoMovimiento::ProductoVencido,
            MotivoMovimiento::ErrorSistema,
            MotivoMovimiento::RoboPerdida,
            MotivoMovimiento::InventarioFisico,
            MotivoMovimiento::Otro,
        ]
    }
}

/// Immutable kardex entry. The client never edits or deletes one; a
/// correction is a new compensating movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovimientoInventario {
    pub id: i64,
    pub producto_id: i64,
    pub tipo_movimiento: TipoMovimiento,
    /// Always positive on the wire; direction is carried by the type.
    pub cantidad: i64,
    #[serde(default)]
    pub bodega_origen_id: Option<i64>,
    #[serde(default)]
    pub bodega_destino_id: Option<i64>,
    pub motivo: MotivoMovimiento,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub referencia: Option<String>,
    pub usuario_id: i64,
    #[serde(default)]
    pub stock_anterior: Option<i64>,
    /// Running balance after this entry.
    pub stock_posterior: i64,
    pub fecha_movimiento: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovimientoCreate {
    pub producto_id: i64,
    pub tipo_movimiento: TipoMovimiento,
    pub cantidad: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bodega_origen_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bodega_destino_id: Option<i64>,
    pub motivo: MotivoMovimiento,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referencia: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovimientoFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producto_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bodega_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_movimiento: Option<TipoMovimiento>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// Signed stock correction: positive `cantidad` adds, negative removes.
/// The server derives the movement type from the sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AjusteInventario {
    pub producto_id: i64,
    pub bodega_id: i64,
    pub cantidad: i64,
    pub motivo: MotivoMovimiento,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
}

/// Transfer between bodegas. Atomicity of the exit/entry pair is the
/// server's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferenciaInventario {
    pub producto_id: i64,
    pub bodega_origen_id: i64,
    pub bodega_destino_id: i64,
    pub cantidad: i64,
    pub motivo: MotivoMovimiento,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferenciaResultado {
    pub movimiento_salida: MovimientoInventario,
    pub movimiento_entrada: MovimientoInventario,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConteoFisico {
    pub producto_id: i64,
    pub bodega_id: i64,
    pub cantidad_fisica: i64,
}

/// Batch physical-count reconciliation; the server computes and records
/// the delta movement for each counted item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventarioFisico {
    pub items: Vec<ConteoFisico>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KardexFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bodega_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KardexResponse {
    pub producto: Producto,
    /// Ordered history, newest first as the server returns it.
    pub movimientos: Vec<MovimientoInventario>,
    pub stock_actual: i64,
}

// ---- reference entities ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categoria {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriaCreate {
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proveedor {
    pub id: i64,
    pub nombre: String,
    pub codigo: String,
    #[serde(default)]
    pub contacto: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProveedorCreate {
    pub nombre: String,
    pub codigo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
}

// ---- auth / users ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub rol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub user: Option<User>,
}
