//! Remote service for reference data: categories and suppliers.

use tracing::instrument;

use crate::errors::ApiError;
use crate::http::HttpClient;
use crate::models::{Categoria, CategoriaCreate, Proveedor, ProveedorCreate};

#[derive(Clone)]
pub struct CatalogoService {
    http: HttpClient,
}

impl CatalogoService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[instrument(skip(self))]
    pub async fn get_categorias(&self) -> Result<Vec<Categoria>, ApiError> {
        self.http.get("/categorias").await
    }

    #[instrument(skip(self, categoria), fields(nombre = %categoria.nombre))]
    pub async fn create_categoria(&self, categoria: &CategoriaCreate) -> Result<Categoria, ApiError> {
        self.http.post("/categorias", categoria).await
    }

    #[instrument(skip(self, cambios))]
    pub async fn update_categoria(
        &self,
        id: i64,
        cambios: &CategoriaCreate,
    ) -> Result<Categoria, ApiError> {
        self.http.put(&format!("/categorias/{}", id), cambios).await
    }

    #[instrument(skip(self))]
    pub async fn delete_categoria(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/categorias/{}", id)).await
    }

    #[instrument(skip(self))]
    pub async fn get_proveedores(&self) -> Result<Vec<Proveedor>, ApiError> {
        self.http.get("/proveedores/").await
    }

    #[instrument(skip(self, proveedor), fields(codigo = %proveedor.codigo))]
    pub async fn create_proveedor(&self, proveedor: &ProveedorCreate) -> Result<Proveedor, ApiError> {
        self.http.post("/proveedores/", proveedor).await
    }

    #[instrument(skip(self, cambios))]
    pub async fn update_proveedor(
        &self,
        id: i64,
        cambios: &ProveedorCreate,
    ) -> Result<Proveedor, ApiError> {
        self.http
            .put(&format!("/proveedores/{}", id), cambios)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_proveedor(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/proveedores/{}", id)).await
    }
}
