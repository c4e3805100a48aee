//! # Módulo Web — API JSON da Triagem
//!
//! Camada fina sobre os pontos de entrada do núcleo, construída com
//! **Axum**. Nenhuma regra de triagem vive aqui.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Axum Router (este módulo)                                │
//! │  ├── GET  /status         → JSON: contagens da base      │
//! │  ├── GET  /condicoes      → JSON: condições e pesos      │
//! │  ├── POST /processar      → NluOutput                    │
//! │  ├── POST /inferir        → InferenceResult              │
//! │  ├── POST /triagem        → TriageReport                 │
//! │  ├── POST /triagem/lote   → [TriageReport]               │
//! │  └── POST /kb/reload      → recarrega a base do disco    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |

pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas da API.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/condicoes", get(handlers::condicoes))
        .route("/processar", post(handlers::processar))
        .route("/inferir", post(handlers::inferir))
        .route("/triagem", post(handlers::triagem))
        .route("/triagem/lote", post(handlers::triagem_lote))
        .route("/kb/reload", post(handlers::kb_reload))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::core::knowledge_base::tests::{sample_kb, SAMPLE_KB};
    use crate::triage::TriageService;

    fn app_with_config(config: AppConfig) -> (Router, AppState) {
        let service = TriageService::new(Arc::new(sample_kb())).unwrap();
        let state = AppState::new(service, config);
        (create_router(state.clone()), state)
    }

    fn app() -> Router {
        app_with_config(AppConfig::default()).0
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn status_reports_counts() {
        let (status, body) = send(app(), "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);
        assert_eq!(body["condicoes"], 2);
        assert_eq!(body["red_flags"], 3);
        assert_eq!(body["mappings"], 7);
    }

    #[tokio::test]
    async fn condicoes_lists_in_kb_order() {
        let (_, body) = send(app(), "GET", "/condicoes", None).await;
        assert_eq!(body[0]["condicao"], "depressao");
        assert_eq!(body[0]["sintomas"]["fadiga"], 0.9);
        assert_eq!(body[1]["condicao"], "ansiedade");
    }

    #[tokio::test]
    async fn processar_returns_nlu_output() {
        let body = json!({"texto": "Estou TRISTE!"});
        let (status, body) = send(app(), "POST", "/processar", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["texto_normalizado"], "estou triste");
        assert_eq!(body["sintomas"]["tristeza_persistente"], 1.0);
        assert_eq!(body["pontuacao_total"], 1.0);
    }

    #[tokio::test]
    async fn inferir_coerces_invalid_facts() {
        let body = json!({"fatos": "fadiga"});
        let (status, body) = send(app(), "POST", "/inferir", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nivel_risco"], "Mínimo");
        assert_eq!(body["resultados"], json!([]));

        let (_, body) = send(
            app(),
            "POST",
            "/inferir",
            Some(json!({"fatos": ["tristeza_persistente", "fadiga", "ideacao_suicida"]})),
        )
        .await;
        assert_eq!(body["nivel_risco"], "Alto");
        assert_eq!(body["resultados"][0]["condicao"], "depressao");
    }

    #[tokio::test]
    async fn triagem_returns_full_report() {
        let body = json!({"texto": "ando ansioso"});
        let (status, body) = send(app(), "POST", "/triagem", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["id"].is_string());
        assert_eq!(body["fatos"], json!(["preocupacao_excessiva"]));
        assert_eq!(body["inferencia"]["resultados"][0]["condicao"], "ansiedade");
    }

    #[tokio::test]
    async fn triagem_lote_preserves_order() {
        let (status, body) = send(
            app(),
            "POST",
            "/triagem/lote",
            Some(json!({"textos": ["muito triste", "coração acelerado"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["nlu"]["texto_original"], "muito triste");
        assert_eq!(body[1]["fatos"], json!(["taquicardia"]));
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let req = Request::builder()
            .method("POST")
            .uri("/triagem")
            .header("content-type", "application/json")
            .body(Body::from("{ não é json"))
            .unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn reload_swaps_knowledge_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.json");
        std::fs::write(&path, SAMPLE_KB).unwrap();
        let config = AppConfig {
            kb_path: path.clone(),
            ..AppConfig::default()
        };
        let (router, state) = app_with_config(config);

        std::fs::write(
            &path,
            r#"{ "condicoes": { "burnout": { "sintomas": { "exaustao": 1.0 } } } }"#,
        )
        .unwrap();
        let (status, body) = send(router.clone(), "POST", "/kb/reload", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["condicoes"], 1);
        assert!(state.service().knowledge_base().condition("burnout").is_some());

        // base inválida: erro 500 e a anterior continua valendo
        std::fs::write(&path, "{ quebrado").unwrap();
        let (status, body) = send(router, "POST", "/kb/reload", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["erro"].as_str().unwrap().contains("JSON"));
        assert!(state.service().knowledge_base().condition("burnout").is_some());
    }
}
