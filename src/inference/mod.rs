//! # Módulo Inference — Pontuação de Condições e Classificação de Risco
//!
//! Recebe o conjunto de fatos produzido pelo NLU e devolve:
//!
//! - condições candidatas ordenadas por score, com justificativa
//! - nível de risco global (com precedência das red flags críticas)
//! - relatório de queixas
//! - recomendações guiadas pelo nível de risco
//!
//! ```text
//! fatos = { tristeza_persistente, fadiga, ideacao_suicida }
//!   ├── depressao: grau 70.4% + bônus red flag → score 1.0
//!   ├── nível: Alto (ideacao_suicida é crítica)
//!   └── recomendações: emergência + adendo de depressão + aviso legal
//! ```
//!
//! Veja [`InferenceEngine`] para o algoritmo.

/// Sub-módulo com o motor de inferência ponderada.
pub mod engine;

/// Sub-módulo com as tabelas de recomendação.
pub mod recommendations;

pub use engine::{ConditionMatch, InferenceEngine, InferenceResult};
