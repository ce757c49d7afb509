//! Remote service for bodegas, stock, movements and the kardex.

use tracing::instrument;

use crate::errors::ApiError;
use crate::http::HttpClient;
use crate::models::{
    AjusteInventario, AlertaStock, Bodega, BodegaCreate, BodegaUpdate, InventarioFisico,
    KardexFilter, KardexResponse, MovimientoCreate, MovimientoFilter, MovimientoInventario,
    StockBodega, StockConsolidado, TransferenciaInventario, TransferenciaResultado,
};

#[derive(Clone)]
pub struct InventarioService {
    http: HttpClient,
}

impl InventarioService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    // ---- bodegas ----

    #[instrument(skip(self))]
    pub async fn get_bodegas(&self, solo_activas: bool) -> Result<Vec<Bodega>, ApiError> {
        self.http
            .get_query("/inventario/bodegas", &[("solo_activas", solo_activas)])
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_bodega(&self, id: i64) -> Result<Bodega, ApiError> {
        self.http.get(&format!("/inventario/bodegas/{}", id)).await
    }

    #[instrument(skip(self, bodega), fields(codigo = %bodega.codigo))]
    pub async fn create_bodega(&self, bodega: &BodegaCreate) -> Result<Bodega, ApiError> {
        self.http.post("/inventario/bodegas", bodega).await
    }

    #[instrument(skip(self, cambios))]
    pub async fn update_bodega(&self, id: i64, cambios: &BodegaUpdate) -> Result<Bodega, ApiError> {
        self.http
            .put(&format!("/inventario/bodegas/{}", id), cambios)
            .await
    }

    /// Deactivates the bodega. The server refuses while it still holds
    /// stock, surfaced as [`ApiError::BusinessRule`].
    #[instrument(skip(self))]
    pub async fn delete_bodega(&self, id: i64) -> Result<(), ApiError> {
        self.http
            .delete(&format!("/inventario/bodegas/{}", id))
            .await
    }

    // ---- stock ----

    #[instrument(skip(self))]
    pub async fn get_stock_producto(&self, producto_id: i64) -> Result<StockConsolidado, ApiError> {
        self.http
            .get(&format!("/inventario/stock/producto/{}", producto_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_stock_bodega(&self, bodega_id: i64) -> Result<Vec<StockBodega>, ApiError> {
        self.http
            .get(&format!("/inventario/stock/bodega/{}", bodega_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_alertas_stock(&self) -> Result<Vec<AlertaStock>, ApiError> {
        self.http.get("/inventario/stock/alertas").await
    }

    // ---- movements ----

    #[instrument(skip(self))]
    pub async fn get_movimientos(
        &self,
        filtro: &MovimientoFilter,
    ) -> Result<Vec<MovimientoInventario>, ApiError> {
        self.http
            .get_query("/inventario/movimientos", filtro)
            .await
    }

    #[instrument(skip(self, movimiento), fields(
        producto_id = movimiento.producto_id,
        tipo = ?movimiento.tipo_movimiento,
    ))]
    pub async fn create_movimiento(
        &self,
        movimiento: &MovimientoCreate,
    ) -> Result<MovimientoInventario, ApiError> {
        self.http.post("/inventario/movimientos", movimiento).await
    }

    /// Signed stock correction; the server derives the movement type
    /// from the sign of `cantidad`.
    #[instrument(skip(self, ajuste), fields(
        producto_id = ajuste.producto_id,
        bodega_id = ajuste.bodega_id,
        cantidad = ajuste.cantidad,
    ))]
    pub async fn ajustar_inventario(
        &self,
        ajuste: &AjusteInventario,
    ) -> Result<MovimientoInventario, ApiError> {
        self.http.post("/inventario/ajuste", ajuste).await
    }

    /// Atomic exit/entry pair between bodegas.
    #[instrument(skip(self, transferencia), fields(
        producto_id = transferencia.producto_id,
        origen = transferencia.bodega_origen_id,
        destino = transferencia.bodega_destino_id,
    ))]
    pub async fn transferir_entre_bodegas(
        &self,
        transferencia: &TransferenciaInventario,
    ) -> Result<TransferenciaResultado, ApiError> {
        self.http
            .post("/inventario/transferencia", transferencia)
            .await
    }

    /// Batch physical-count reconciliation; returns the compensating
    /// movements the server recorded.
    #[instrument(skip(self, inventario), fields(items = inventario.items.len()))]
    pub async fn realizar_inventario_fisico(
        &self,
        inventario: &InventarioFisico,
    ) -> Result<Vec<MovimientoInventario>, ApiError> {
        self.http
            .post("/inventario/inventario-fisico", inventario)
            .await
    }

    // ---- kardex ----

    #[instrument(skip(self))]
    pub async fn get_kardex(
        &self,
        producto_id: i64,
        filtro: &KardexFilter,
    ) -> Result<KardexResponse, ApiError> {
        self.http
            .get_query(&format!("/inventario/kardex/{}", producto_id), filtro)
            .await
    }
}
