//! # HTTP Adapter Tests
//!
//! Session handling, query encoding, deadlines and wire mapping, exercised
//! through a full [`ClientContext`] over the fake backend.

mod common;

use biuai_client::services::api::{lancamentos, LancamentoFilters, Method};
use biuai_client::store::storage::keys;
use biuai_client::store::{DataOrigin, Storage};
use biuai_client::{AppError, ClientEvent};
use common::{signed_in, FakeBackend};
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_401_clears_session_and_emits_session_expired() {
    // Arrange
    let backend = FakeBackend::new();
    let (ctx, storage) = signed_in(&backend).await;
    assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("tok-abc"));
    backend.on(Method::Get, "/financeiro", 401, json!({"detail": "Token expirado"}));

    // Act
    let err = ctx.lancamentos.load().await.unwrap_err();

    // Assert
    assert!(matches!(err, AppError::Auth(ref detail) if detail == "Token expirado"));
    assert!(!ctx.session.is_authenticated());
    assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    assert_eq!(storage.get(keys::USER).unwrap(), None);
    assert!(ctx.events.drain().contains(&ClientEvent::SessionExpired));
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let backend = FakeBackend::new();
    let (ctx, _storage) = signed_in(&backend).await;
    backend.on(Method::Get, "/financeiro", 200, json!([]));

    ctx.lancamentos.load().await.unwrap();

    let request = backend.last_to("/financeiro").unwrap();
    assert_eq!(request.header("Authorization"), Some("Bearer tok-abc"));
    // Login itself is anonymous
    let login = backend.last_to("/api/v1/auth/login").unwrap();
    assert_eq!(login.header("Authorization"), None);
}

#[tokio::test]
async fn test_absent_filters_are_omitted_from_query() {
    // Arrange
    let backend = FakeBackend::new();
    let (ctx, _storage) = signed_in(&backend).await;
    backend.on(Method::Get, "/financeiro", 200, json!([]));

    // Act
    ctx.lancamentos.collection().set_filters(LancamentoFilters {
        search: Some("mercado".to_string()),
        limit: Some(50),
        ..Default::default()
    });
    ctx.lancamentos.load().await.unwrap();

    // Assert
    let request = backend.last_to("/financeiro").unwrap();
    let mut names: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["limit", "search"]);
    assert_eq!(request.query_value("search"), Some("mercado"));
}

#[tokio::test]
async fn test_blank_search_is_omitted() {
    let backend = FakeBackend::new();
    let (ctx, _storage) = signed_in(&backend).await;
    backend.on(Method::Get, "/financeiro", 200, json!([]));

    let filters = LancamentoFilters {
        search: Some("   ".to_string()),
        ..Default::default()
    };
    lancamentos::list(&ctx.api, &filters).await.unwrap();

    assert!(backend.last_to("/financeiro").unwrap().query.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_backend_maps_to_timeout() {
    // Arrange
    let backend = FakeBackend::new();
    let (ctx, _storage) = signed_in(&backend).await;
    backend.on_with(Method::Get, "/financeiro", Duration::from_secs(30), |_| (200, json!([])));

    // Act
    let err = lancamentos::list(&ctx.api, &LancamentoFilters::default())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err, AppError::Timeout(ctx.config.http_timeout));
    assert!(ctx.session.is_authenticated());
}

#[tokio::test]
async fn test_http_error_keeps_backend_detail() {
    let backend = FakeBackend::new();
    let (ctx, _storage) = signed_in(&backend).await;
    backend.on(Method::Delete, "/financeiro/7", 403, json!({"detail": "Sem permissão"}));

    let err = ctx.lancamentos.delete(7).await.unwrap_err();
    assert_eq!(
        err,
        AppError::Http {
            status: 403,
            detail: "Sem permissão".to_string()
        }
    );
}

#[tokio::test]
async fn test_wire_rows_are_normalized() {
    // Arrange: a negative despesa, an alternate date field, a lowercase
    // kind and one row with an unknown kind
    let backend = FakeBackend::new();
    let (ctx, _storage) = signed_in(&backend).await;
    backend.on(
        Method::Get,
        "/financeiro",
        200,
        json!([
            {"id": 1, "descricao": "Salário", "valor": 100.0, "tipo": "receita", "data": "2024-01-05"},
            {"id": 2, "descricao": "Mercado", "valor": -40.0, "tipo": "DESPESA", "data_lancamento": "2024-01-20T10:00:00"},
            {"id": 3, "descricao": "???", "valor": 5.0, "tipo": "TRANSFERENCIA", "data_lancamento": "2024-02-01"},
        ]),
    );

    // Act
    let loaded = ctx.lancamentos.load().await.unwrap();

    // Assert
    assert_eq!(loaded.origin, DataOrigin::Fresh);
    assert_eq!(loaded.data.len(), 2);
    assert_eq!(loaded.data[1].valor, Decimal::from(40));

    let summary = ctx.lancamentos.local_summary();
    assert_eq!(summary.total_receitas, Decimal::from(100));
    assert_eq!(summary.total_despesas, Decimal::from(40));
    assert_eq!(summary.saldo, Decimal::from(60));
}

#[tokio::test]
async fn test_summary_query_and_wire_mapping() {
    let backend = FakeBackend::new();
    let (ctx, _storage) = signed_in(&backend).await;
    backend.on(
        Method::Get,
        "/financeiro/summary/stats",
        200,
        json!({"total_receitas": 5000.0, "total_despesas": 3000.0, "count": 12}),
    );

    let summary = ctx.lancamentos.summary(90).await.unwrap().data;

    let request = backend.last_to("/financeiro/summary/stats").unwrap();
    assert_eq!(request.query_value("periodo_dias"), Some("90"));
    assert_eq!(summary.saldo, Decimal::from(2000));
    assert_eq!(summary.total_lancamentos, 12);
    assert_eq!(summary.periodo_dias, Some(90));
}
