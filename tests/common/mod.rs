#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::MockServer;

use svt_inventory_client::config::ClientConfig;
use svt_inventory_client::store::InventoryStore;

pub async fn mock_store() -> (MockServer, InventoryStore) {
    let server = MockServer::start().await;
    let store = InventoryStore::new(&ClientConfig::new(server.uri())).unwrap();
    (server, store)
}

pub fn stock_consolidado(producto_id: i64, bodega_cantidad: i64, stock_total: i64) -> Value {
    json!({
        "producto_id": producto_id,
        "sku": "HER-001",
        "nombre": "Taladro percutor",
        "stock_total": stock_total,
        "stock_minimo": 5,
        "estado": "NORMAL",
        "stock_por_bodega": [
            {"producto_id": producto_id, "bodega_id": 1, "bodega_nombre": "Bodega Central",
             "cantidad": bodega_cantidad, "ubicacion": "A-3"}
        ]
    })
}

pub fn stock_dos_bodegas(producto_id: i64, bodega1: i64, bodega2: i64) -> Value {
    json!({
        "producto_id": producto_id,
        "sku": "HER-001",
        "nombre": "Taladro percutor",
        "stock_total": bodega1 + bodega2,
        "stock_minimo": 5,
        "estado": "NORMAL",
        "stock_por_bodega": [
            {"producto_id": producto_id, "bodega_id": 1, "bodega_nombre": "Bodega Central",
             "cantidad": bodega1, "ubicacion": "A-3"},
            {"producto_id": producto_id, "bodega_id": 2, "bodega_nombre": "Bodega Norte",
             "cantidad": bodega2, "ubicacion": null}
        ]
    })
}

pub fn producto(id: i64, stock_actual: i64) -> Value {
    json!({
        "id": id,
        "sku": "HER-001",
        "nombre": "Taladro percutor",
        "descripcion": null,
        "categoria": "herramientas",
        "precio_unitario": "45990",
        "proveedor_id": 3,
        "stock_minimo": 5,
        "stock_actual": stock_actual,
        "fecha_creacion": "2026-01-12T09:00:00",
        "fecha_actualizacion": "2026-08-20T10:30:00"
    })
}

pub fn movimiento(id: i64, tipo: &str, cantidad: i64, stock_posterior: i64) -> Value {
    json!({
        "id": id,
        "producto_id": 7,
        "tipo_movimiento": tipo,
        "cantidad": cantidad,
        "bodega_origen_id": 1,
        "bodega_destino_id": null,
        "motivo": "AJUSTE_STOCK",
        "observaciones": null,
        "referencia": null,
        "usuario_id": 2,
        "stock_anterior": stock_posterior + cantidad,
        "stock_posterior": stock_posterior,
        "fecha_movimiento": "2026-08-20T10:30:00"
    })
}

pub fn bodega(id: i64, codigo: &str) -> Value {
    json!({
        "id": id,
        "codigo": codigo,
        "nombre": format!("Bodega {}", codigo),
        "direccion": null,
        "encargado": null,
        "telefono": null,
        "activa": true
    })
}
