mod common;

use assert_matches::assert_matches;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use svt_inventory_client::cache::QueryScope;
use svt_inventory_client::errors::ApiError;
use svt_inventory_client::models::{AjusteInventario, MotivoMovimiento, TipoMovimiento};

fn ajuste(cantidad: i64) -> AjusteInventario {
    AjusteInventario {
        producto_id: 7,
        bodega_id: 1,
        cantidad,
        motivo: MotivoMovimiento::AjusteStock,
        observaciones: Some("conteo de pasillo".into()),
    }
}

#[tokio::test]
async fn accepted_adjustment_confirms_and_reconciles() {
    let (server, store) = common::mock_store().await;

    Mock::given(method("GET"))
        .and(path("/inventario/stock/producto/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::stock_consolidado(7, 20, 20)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/inventario/stock/producto/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::stock_consolidado(7, 15, 15)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/inventario/ajuste"))
        .and(body_partial_json(serde_json::json!({
            "producto_id": 7,
            "bodega_id": 1,
            "cantidad": -5,
            "motivo": "AJUSTE_STOCK"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::movimiento(91, "AJUSTE_NEGATIVO", 5, 15)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/productos/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::producto(7, 15)))
        .mount(&server)
        .await;

    assert_eq!(store.stock_producto(7).await.unwrap().stock_total, 20);

    let generations_before: Vec<u64> = [
        QueryScope::Productos,
        QueryScope::Stock,
        QueryScope::Movimientos,
        QueryScope::Alertas,
    ]
    .iter()
    .map(|s| store.cache().generation(*s))
    .collect();

    let movimiento = store.ajustar_inventario(ajuste(-5)).await.unwrap();
    assert_eq!(movimiento.tipo_movimiento, TipoMovimiento::AjusteNegativo);
    assert_eq!(movimiento.cantidad, 5);
    assert_eq!(movimiento.stock_posterior, 15);

    for (scope, before) in [
        QueryScope::Productos,
        QueryScope::Stock,
        QueryScope::Movimientos,
        QueryScope::Alertas,
    ]
    .iter()
    .zip(generations_before)
    {
        assert_eq!(store.cache().generation(*scope), before + 1, "{:?}", scope);
    }

    // Reconciled inline after the confirm, so this is a cache hit.
    assert_eq!(store.stock_producto(7).await.unwrap().stock_total, 15);
}

#[tokio::test]
async fn rejected_adjustment_rolls_back_and_surfaces_field_errors() {
    let (server, store) = common::mock_store().await;

    Mock::given(method("GET"))
        .and(path("/inventario/stock/producto/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::stock_consolidado(7, 20, 20)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/inventario/ajuste"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "detail": [{
                "loc": ["body", "cantidad"],
                "msg": "El ajuste dejaría el stock en negativo",
                "type": "value_error"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(store.stock_producto(7).await.unwrap().stock_total, 20);

    let error = store.ajustar_inventario(ajuste(-25)).await.unwrap_err();
    let payload = assert_matches!(error, ApiError::Validation(p) => p);
    let fields = payload.field_errors();
    assert_eq!(
        fields["cantidad"],
        vec!["El ajuste dejaría el stock en negativo"]
    );

    // Rolled back: the cached value is served, no extra GET happens.
    assert_eq!(store.stock_producto(7).await.unwrap().stock_total, 20);

    // No scope was invalidated by the failed mutation.
    assert_eq!(store.cache().generation(QueryScope::Stock), 0);
}

#[tokio::test]
async fn business_rule_rejection_carries_the_backend_message() {
    let (server, store) = common::mock_store().await;

    Mock::given(method("POST"))
        .and(path("/inventario/ajuste"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Stock insuficiente en bodega Central"
        })))
        .mount(&server)
        .await;

    let error = store.ajustar_inventario(ajuste(-5)).await.unwrap_err();
    assert!(!error.is_retryable());
    assert_matches!(error, ApiError::BusinessRule(msg) => {
        assert_eq!(msg, "Stock insuficiente en bodega Central");
    });
}
