//! Cached facade over the remote services.
//!
//! Reads go through the query cache; writes go straight to the backend
//! and then invalidate every scope derived from the mutated stock, with
//! a targeted inline refetch of the touched product so its next render
//! is already reconciled. Adjustments additionally stage an optimistic
//! patch while the request is in flight.

use std::sync::Arc;
use tracing::{instrument, warn};

use crate::cache::{QueryCache, QueryKey, QueryScope};
use crate::config::ClientConfig;
use crate::errors::ApiError;
use crate::http::HttpClient;
use crate::models::{
    AjusteInventario, AlertaStock, Bodega, BodegaCreate, BodegaUpdate, InventarioFisico,
    KardexFilter, KardexResponse, MovimientoCreate, MovimientoFilter, MovimientoInventario,
    Producto, ProductoCreate, ProductoFilter, ProductoUpdate, StockBodega, StockConsolidado,
    TransferenciaInventario, TransferenciaResultado,
};
use crate::optimistic::{stage_adjustment, STOCK_DEPENDENT_SCOPES};
use crate::services::{
    AuthService, CatalogoService, InventarioService, ProductoService, UserService,
};
use crate::session::{Preferences, SessionStore};

pub struct InventoryStore {
    cache: Arc<QueryCache>,
    session: Arc<SessionStore>,
    preferences: Arc<Preferences>,
    auth: AuthService,
    users: UserService,
    productos: ProductoService,
    inventario: InventarioService,
    catalogo: CatalogoService,
    alertas_poll: std::time::Duration,
}

impl InventoryStore {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let session = Arc::new(match &config.session_file {
            Some(path) => SessionStore::load(path),
            None => SessionStore::in_memory(),
        });
        let preferences = Arc::new(match &config.preferences_file {
            Some(path) => Preferences::load(path),
            None => Preferences::in_memory(),
        });

        let http = HttpClient::new(config, Arc::clone(&session))?;

        Ok(Self {
            cache: Arc::new(QueryCache::new(config.cache.clone())),
            auth: AuthService::new(http.clone(), Arc::clone(&session)),
            users: UserService::new(http.clone()),
            productos: ProductoService::new(http.clone()),
            inventario: InventarioService::new(http.clone()),
            catalogo: CatalogoService::new(http),
            session,
            preferences,
            alertas_poll: config.alertas_poll_interval(),
        })
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Ends the session and drops every cached value, so a later login
    /// as a different user starts from an empty cache.
    pub fn logout(&self) {
        self.auth.logout();
        self.cache.invalidate_all();
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn catalogo(&self) -> &CatalogoService {
        &self.catalogo
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    // ---- cached reads ----

    pub async fn productos(&self, filtro: ProductoFilter) -> Result<Vec<Producto>, ApiError> {
        let svc = self.productos.clone();
        let key = QueryKey::Productos(filtro.clone());
        self.cache
            .fetch(key, move || async move { svc.get_productos(&filtro).await })
            .await
    }

    pub async fn producto(&self, id: i64) -> Result<Producto, ApiError> {
        let svc = self.productos.clone();
        self.cache
            .fetch(QueryKey::Producto(id), move || async move {
                svc.get_producto(id).await
            })
            .await
    }

    pub async fn bodegas(&self, solo_activas: bool) -> Result<Vec<Bodega>, ApiError> {
        let svc = self.inventario.clone();
        self.cache
            .fetch(QueryKey::Bodegas { solo_activas }, move || async move {
                svc.get_bodegas(solo_activas).await
            })
            .await
    }

    pub async fn bodega(&self, id: i64) -> Result<Bodega, ApiError> {
        let svc = self.inventario.clone();
        self.cache
            .fetch(QueryKey::Bodega(id), move || async move {
                svc.get_bodega(id).await
            })
            .await
    }

    pub async fn stock_producto(&self, producto_id: i64) -> Result<StockConsolidado, ApiError> {
        let svc = self.inventario.clone();
        self.cache
            .fetch(QueryKey::StockProducto(producto_id), move || async move {
                svc.get_stock_producto(producto_id).await
            })
            .await
    }

    pub async fn stock_bodega(&self, bodega_id: i64) -> Result<Vec<StockBodega>, ApiError> {
        let svc = self.inventario.clone();
        self.cache
            .fetch(QueryKey::StockBodega(bodega_id), move || async move {
                svc.get_stock_bodega(bodega_id).await
            })
            .await
    }

    pub async fn alertas(&self) -> Result<Vec<AlertaStock>, ApiError> {
        let svc = self.inventario.clone();
        self.cache
            .fetch(QueryKey::Alertas, move || async move {
                svc.get_alertas_stock().await
            })
            .await
    }

    pub async fn movimientos(
        &self,
        filtro: MovimientoFilter,
    ) -> Result<Vec<MovimientoInventario>, ApiError> {
        let svc = self.inventario.clone();
        let key = QueryKey::Movimientos(filtro.clone());
        self.cache
            .fetch(key, move || async move { svc.get_movimientos(&filtro).await })
            .await
    }

    pub async fn kardex(
        &self,
        producto_id: i64,
        filtro: KardexFilter,
    ) -> Result<KardexResponse, ApiError> {
        let svc = self.inventario.clone();
        let key = QueryKey::Kardex {
            producto_id,
            filtro: filtro.clone(),
        };
        self.cache
            .fetch(key, move || async move {
                svc.get_kardex(producto_id, &filtro).await
            })
            .await
    }

    // ---- stock mutations ----

    /// Optimistic adjustment: cached projections of the product are
    /// patched before the request resolves and restored verbatim if the
    /// server rejects it.
    #[instrument(skip(self, ajuste), fields(producto_id = ajuste.producto_id))]
    pub async fn ajustar_inventario(
        &self,
        ajuste: AjusteInventario,
    ) -> Result<MovimientoInventario, ApiError> {
        let staged = stage_adjustment(&self.cache, &ajuste);
        match self.inventario.ajustar_inventario(&ajuste).await {
            Ok(movimiento) => {
                staged.confirm();
                self.cache.invalidate_scope(QueryScope::Kardex);
                self.reconcile_producto(ajuste.producto_id).await;
                Ok(movimiento)
            }
            Err(e) => {
                staged.roll_back();
                Err(e)
            }
        }
    }

    /// Transfers also move stock between bodegas, so the bodega scope is
    /// invalidated on top of the usual stock-derived scopes.
    #[instrument(skip(self, transferencia), fields(producto_id = transferencia.producto_id))]
    pub async fn transferir_entre_bodegas(
        &self,
        transferencia: TransferenciaInventario,
    ) -> Result<TransferenciaResultado, ApiError> {
        let resultado = self
            .inventario
            .transferir_entre_bodegas(&transferencia)
            .await?;
        self.invalidate_after_stock_change();
        self.cache.invalidate_scope(QueryScope::Bodegas);
        self.reconcile_producto(transferencia.producto_id).await;
        Ok(resultado)
    }

    #[instrument(skip(self, inventario), fields(items = inventario.items.len()))]
    pub async fn realizar_inventario_fisico(
        &self,
        inventario: InventarioFisico,
    ) -> Result<Vec<MovimientoInventario>, ApiError> {
        let movimientos = self
            .inventario
            .realizar_inventario_fisico(&inventario)
            .await?;
        self.invalidate_after_stock_change();
        Ok(movimientos)
    }

    #[instrument(skip(self, movimiento), fields(producto_id = movimiento.producto_id))]
    pub async fn crear_movimiento(
        &self,
        movimiento: MovimientoCreate,
    ) -> Result<MovimientoInventario, ApiError> {
        let creado = self.inventario.create_movimiento(&movimiento).await?;
        self.invalidate_after_stock_change();
        self.reconcile_producto(movimiento.producto_id).await;
        Ok(creado)
    }

    // ---- catalog mutations ----

    pub async fn crear_producto(&self, producto: ProductoCreate) -> Result<Producto, ApiError> {
        let creado = self.productos.create_producto(&producto).await?;
        self.cache.invalidate_scope(QueryScope::Productos);
        self.cache.invalidate_scope(QueryScope::Stock);
        Ok(creado)
    }

    pub async fn actualizar_producto(
        &self,
        id: i64,
        cambios: ProductoUpdate,
    ) -> Result<Producto, ApiError> {
        let actualizado = self.productos.update_producto(id, &cambios).await?;
        self.cache.invalidate_scope(QueryScope::Productos);
        // stock_minimo feeds the server-side alert computation.
        self.cache.invalidate_scope(QueryScope::Alertas);
        Ok(actualizado)
    }

    pub async fn eliminar_producto(&self, id: i64) -> Result<(), ApiError> {
        self.productos.delete_producto(id).await?;
        self.cache.invalidate_scope(QueryScope::Productos);
        self.cache.invalidate_scope(QueryScope::Stock);
        self.cache.invalidate_scope(QueryScope::Alertas);
        Ok(())
    }

    pub async fn crear_bodega(&self, bodega: BodegaCreate) -> Result<Bodega, ApiError> {
        let creada = self.inventario.create_bodega(&bodega).await?;
        self.cache.invalidate_scope(QueryScope::Bodegas);
        Ok(creada)
    }

    pub async fn actualizar_bodega(
        &self,
        id: i64,
        cambios: BodegaUpdate,
    ) -> Result<Bodega, ApiError> {
        let actualizada = self.inventario.update_bodega(id, &cambios).await?;
        self.cache.invalidate_scope(QueryScope::Bodegas);
        Ok(actualizada)
    }

    pub async fn eliminar_bodega(&self, id: i64) -> Result<(), ApiError> {
        self.inventario.delete_bodega(id).await?;
        self.cache.invalidate_scope(QueryScope::Bodegas);
        Ok(())
    }

    // ---- background refresh ----

    /// Spawns the periodic alert refresh. The task polls until the handle
    /// is aborted; individual failures are logged and skipped.
    pub fn spawn_alertas_polling(&self) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(&self.cache);
        let svc = self.inventario.clone();
        let period = self.alertas_poll;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let svc = svc.clone();
                let refreshed = cache
                    .refetch(QueryKey::Alertas, move || async move {
                        svc.get_alertas_stock().await
                    })
                    .await;
                if let Err(e) = refreshed {
                    warn!(error = %e, "alert refresh failed");
                }
            }
        })
    }

    fn invalidate_after_stock_change(&self) {
        for scope in STOCK_DEPENDENT_SCOPES {
            self.cache.invalidate_scope(scope);
        }
        self.cache.invalidate_scope(QueryScope::Kardex);
    }

    /// Inline refetch of the mutated product's detail and consolidated
    /// stock. Failure here is not a mutation failure: the scopes are
    /// already invalidated, so the next read self-heals.
    async fn reconcile_producto(&self, producto_id: i64) {
        let inv = self.inventario.clone();
        let stock = self
            .cache
            .refetch(QueryKey::StockProducto(producto_id), move || async move {
                inv.get_stock_producto(producto_id).await
            })
            .await;
        if let Err(e) = stock {
            warn!(producto_id, error = %e, "post-mutation stock refetch failed");
        }

        let prod = self.productos.clone();
        let detail = self
            .cache
            .refetch(QueryKey::Producto(producto_id), move || async move {
                prod.get_producto(producto_id).await
            })
            .await;
        if let Err(e) = detail {
            warn!(producto_id, error = %e, "post-mutation product refetch failed");
        }
    }
}
