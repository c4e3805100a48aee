//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Tudo na triagem gira em torno destes tipos:
//!
//! - [`KnowledgeBase`] — regras declarativas (condições, red flags, mapeamentos, limiares)
//! - [`Condition`] — condição psicológica com perfil de sintomas ponderados
//! - [`LexicalMapping`] — frase de superfície → sintoma normalizado
//! - [`Thresholds`] — três pontos de corte ascendentes
//! - [`RiskTier`] — Mínimo, Baixo, Médio ou Alto
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use triagem_mental::core::{KnowledgeBase, RiskTier};
//!
//! let kb = KnowledgeBase::from_json_str(r#"{
//!     "condicoes": { "depressao": { "descricao": "", "sintomas": { "fadiga": 0.9 } } }
//! }"#).unwrap();
//!
//! assert!(kb.condition("depressao").is_some());
//! assert_eq!(kb.thresholds().classify(0.8), RiskTier::Alto);
//! ```

/// Sub-módulo com [`KnowledgeBase`], [`Condition`] e [`LexicalMapping`].
pub mod knowledge_base;

/// Sub-módulo com [`RiskTier`] e [`Thresholds`].
pub mod risk;

pub use knowledge_base::{Condition, KnowledgeBase, LexicalMapping};
pub use risk::{RiskTier, Thresholds};
