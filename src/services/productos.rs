//! Remote service for the product catalog.

use tracing::instrument;

use crate::errors::ApiError;
use crate::http::HttpClient;
use crate::models::{Producto, ProductoCreate, ProductoFilter, ProductoUpdate};

#[derive(Clone)]
pub struct ProductoService {
    http: HttpClient,
}

impl ProductoService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[instrument(skip(self))]
    pub async fn get_productos(&self, filtro: &ProductoFilter) -> Result<Vec<Producto>, ApiError> {
        self.http.get_query("/productos", filtro).await
    }

    #[instrument(skip(self))]
    pub async fn get_producto(&self, id: i64) -> Result<Producto, ApiError> {
        self.http.get(&format!("/productos/{}", id)).await
    }

    #[instrument(skip(self, producto), fields(sku = %producto.sku))]
    pub async fn create_producto(&self, producto: &ProductoCreate) -> Result<Producto, ApiError> {
        self.http.post("/productos", producto).await
    }

    #[instrument(skip(self, cambios))]
    pub async fn update_producto(
        &self,
        id: i64,
        cambios: &ProductoUpdate,
    ) -> Result<Producto, ApiError> {
        self.http.put(&format!("/productos/{}", id), cambios).await
    }

    #[instrument(skip(self))]
    pub async fn delete_producto(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/productos/{}", id)).await
    }
}
