//! # Triagem Mental — Triagem Textual de Saúde Mental
//!
//! Recebe a descrição livre, em português, do estado de uma pessoa e
//! produz um relatório de triagem **não diagnóstico**: sintomas
//! reconhecidos, sinais de alerta (red flags), condições compatíveis
//! ranqueadas, nível de risco e recomendações.
//!
//! ## Arquitetura
//!
//! ```text
//! texto ──► nlu::NluPipeline ──► fatos ──► inference::InferenceEngine ──► InferenceResult
//!              │                                   │
//!              └──────── core::KnowledgeBase ──────┘   (JSON, somente leitura)
//!
//! triage::TriageService  = NLU + inferência + resumo
//! web::create_router     = API JSON sobre o TriageService
//! ```
//!
//! ## Exemplo
//!
//! ```no_run
//! use std::sync::Arc;
//! use triagem_mental::core::KnowledgeBase;
//! use triagem_mental::triage::TriageService;
//!
//! let kb = Arc::new(KnowledgeBase::load("data/base_conhecimento.json")?);
//! let service = TriageService::new(kb)?;
//! let report = service.triar("Ando muito triste e cansado, não durmo direito.");
//! println!("{}", report.inferencia.nivel_risco);
//! # Ok::<(), triagem_mental::error::ConfigurationError>(())
//! ```

/// Módulo `config` — configuração por variáveis de ambiente.
pub mod config;

/// Módulo `core` — base de conhecimento e níveis de risco.
pub mod core;

/// Módulo `error` — erros de carregamento da base.
pub mod error;

/// Módulo `inference` — motor de inferência por correspondência ponderada.
pub mod inference;

/// Módulo `nlu` — normalização, extração de sintomas, red flags e resumo.
pub mod nlu;

/// Módulo `triage` — serviço que encadeia NLU e inferência.
pub mod triage;

/// Módulo `web` — API JSON em axum.
pub mod web;
