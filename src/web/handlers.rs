//! # Handlers HTTP — Os Endpoints da Triagem
//!
//! Cada função pública é um handler Axum, mapeado a uma rota em
//! [`super::create_router()`]. Todos respondem JSON.
//!
//! | Handler | Método | Entrada | Retorno |
//! |---------|--------|---------|---------|
//! | `status` | GET | — | contagens da base |
//! | `condicoes` | GET | — | condições e pesos |
//! | `processar` | POST | `{texto}` | saída do NLU |
//! | `inferir` | POST | `{fatos}` | resultado da inferência |
//! | `triagem` | POST | `{texto}` | relatório completo |
//! | `triagem_lote` | POST | `{textos}` | lista de relatórios |
//! | `kb_reload` | POST | — | recarga da base |
//!
//! Trabalho de CPU em lote e leitura de disco rodam em `spawn_blocking`
//! para não bloquear o runtime.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::state::AppState;
use crate::inference::InferenceResult;
use crate::nlu::NluOutput;
use crate::triage::TriageReport;

/// Resposta de `/status`.
#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub ready: bool,
    pub condicoes: usize,
    pub red_flags: usize,
    pub mappings: usize,
}

/// Condição como exposta em `/condicoes`.
#[derive(Serialize, Deserialize)]
pub struct ConditionView {
    pub condicao: String,
    pub descricao: String,
    pub sintomas: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
pub struct TextoRequest {
    #[serde(default)]
    pub texto: String,
}

/// `fatos` aceita qualquer JSON; formas inválidas viram conjunto vazio.
#[derive(Deserialize)]
pub struct InferirRequest {
    #[serde(default)]
    pub fatos: Value,
}

#[derive(Deserialize)]
pub struct LoteRequest {
    #[serde(default)]
    pub textos: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ReloadResponse {
    pub ok: bool,
    pub condicoes: usize,
}

/// Corpo de erro padrão.
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub erro: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(erro: impl ToString) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            erro: erro.to_string(),
        }),
    )
}

/// GET `/status`
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let service = state.service();
    let kb = service.knowledge_base();
    Json(StatusResponse {
        ready: true,
        condicoes: kb.condition_count(),
        red_flags: kb.red_flag_count(),
        mappings: kb.mapping_count(),
    })
}

/// GET `/condicoes`
pub async fn condicoes(State(state): State<AppState>) -> Json<Vec<ConditionView>> {
    let service = state.service();
    let views = service
        .knowledge_base()
        .conditions()
        .iter()
        .map(|c| ConditionView {
            condicao: c.id.clone(),
            descricao: c.descricao.clone(),
            sintomas: c.sintomas.iter().cloned().collect(),
        })
        .collect();
    Json(views)
}

/// POST `/processar`
pub async fn processar(
    State(state): State<AppState>,
    Json(req): Json<TextoRequest>,
) -> Json<NluOutput> {
    tracing::debug!(chars = req.texto.chars().count(), "POST /processar");
    Json(state.service().nlu().processar_texto(&req.texto))
}

/// POST `/inferir`
pub async fn inferir(
    State(state): State<AppState>,
    Json(req): Json<InferirRequest>,
) -> Json<InferenceResult> {
    tracing::debug!(fatos = %req.fatos, "POST /inferir");
    Json(state.service().engine().inferir_json(&req.fatos))
}

/// POST `/triagem`
pub async fn triagem(
    State(state): State<AppState>,
    Json(req): Json<TextoRequest>,
) -> Json<TriageReport> {
    tracing::debug!(chars = req.texto.chars().count(), "POST /triagem");
    Json(state.service().triar(&req.texto))
}

/// POST `/triagem/lote`
pub async fn triagem_lote(
    State(state): State<AppState>,
    Json(req): Json<LoteRequest>,
) -> Result<Json<Vec<TriageReport>>, ApiError> {
    tracing::debug!(textos = req.textos.len(), "POST /triagem/lote");
    let service = state.service();
    let reports = tokio::task::spawn_blocking(move || service.triar_lote(&req.textos))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Falha na triagem em lote");
            internal_error(e)
        })?;
    Ok(Json(reports))
}

/// POST `/kb/reload`
pub async fn kb_reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let reloaded = tokio::task::spawn_blocking(move || state.reload())
        .await
        .map_err(internal_error)?;
    match reloaded {
        Ok(service) => Ok(Json(ReloadResponse {
            ok: true,
            condicoes: service.knowledge_base().condition_count(),
        })),
        Err(e) => {
            tracing::error!(error = %e, "Falha ao recarregar base, mantendo a anterior");
            Err(internal_error(e))
        }
    }
}
