//! # Pipeline NLU — Do Texto Livre aos Sinais
//!
//! O [`NluPipeline`] transforma a descrição livre do estado de uma pessoa
//! em sinais estruturados que o motor de inferência consome.
//!
//! ## Fluxo de Processamento
//!
//! ```text
//! Texto do usuário
//!   ├── 1. Normalizar (NFC, lowercase, sem pontuação)     → normalizer
//!   ├── 2. Extrair sintomas por mapeamento léxico          → extractor::SymptomExtractor
//!   ├── 3. Detectar red flags                              → extractor::RedFlagDetector
//!   ├── 4. Resumir a queixa (texto original)               → summary
//!   └── 5. Pontuação total = Σ ocorrências
//! ```
//!
//! Todos os passos são funções puras sobre a [`KnowledgeBase`] compartilhada.
//! O pipeline é imutável após a criação e pode ser usado por várias
//! threads ao mesmo tempo.
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`normalizer`] | Forma canônica do texto |
//! | [`extractor`] | Sintomas e red flags com fronteira de palavra |
//! | [`summary`] | Frases representativas da queixa |
//! | [`similarity`] | Capacidade opcional de similaridade entre termos |

/// Sub-módulo de normalização de texto.
pub mod normalizer;

/// Sub-módulo dos extratores de sintomas e red flags.
pub mod extractor;

/// Sub-módulo do gerador de resumo.
pub mod summary;

/// Sub-módulo da similaridade plugável.
pub mod similarity;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use crate::core::KnowledgeBase;
use crate::error::Result;

use extractor::{RedFlagDetector, SymptomExtractor};
use similarity::SimilarityProvider;
use summary::SummaryGenerator;

/// Resultado do processamento NLU de um texto.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NluOutput {
    pub texto_original: String,
    pub texto_normalizado: String,
    /// Sintoma → número de termos léxicos distintos encontrados.
    pub sintomas: BTreeMap<String, f64>,
    /// Red flags detectadas, em ordem alfabética.
    pub red_flags: BTreeSet<String>,
    pub resumo: String,
    pub pontuacao_total: f64,
}

impl NluOutput {
    /// Conjunto de fatos para o motor: sintomas ∪ red flags.
    pub fn facts(&self) -> BTreeSet<String> {
        self.sintomas
            .keys()
            .chain(self.red_flags.iter())
            .map(|f| f.to_lowercase())
            .collect()
    }
}

/// Pipeline NLU completo sobre uma base compartilhada.
pub struct NluPipeline {
    kb: Arc<KnowledgeBase>,
    extractor: SymptomExtractor,
    red_flags: RedFlagDetector,
    summary: SummaryGenerator,
}

impl NluPipeline {
    /// Compila os padrões de busca a partir da base.
    ///
    /// # Erros
    ///
    /// [`ConfigurationError::Pattern`](crate::error::ConfigurationError::Pattern)
    /// se algum termo léxico não puder ser compilado.
    pub fn new(kb: Arc<KnowledgeBase>) -> Result<Self> {
        let extractor = SymptomExtractor::new(&kb)?;
        let red_flags = RedFlagDetector::new(&kb)?;
        let summary = SummaryGenerator::new(&kb);
        Ok(Self {
            kb,
            extractor,
            red_flags,
            summary,
        })
    }

    /// Habilita similaridade aproximada na extração de sintomas.
    pub fn with_similarity(mut self, provider: Arc<dyn SimilarityProvider>) -> Self {
        self.extractor = self.extractor.with_similarity(provider);
        self
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    /// Processa um texto livre. Texto vazio ou só com espaços retorna
    /// [`NluOutput`] vazio.
    pub fn processar_texto(&self, texto: &str) -> NluOutput {
        if texto.trim().is_empty() {
            return NluOutput::default();
        }

        let normalizado = normalizer::normalize(texto);
        let sintomas = self.extractor.extract(&normalizado);
        let red_flags = self.red_flags.detect(&normalizado);
        let resumo = self.summary.summarize(texto, &sintomas);
        let pontuacao_total = sintomas.values().sum();

        tracing::debug!(
            sintomas = ?sintomas,
            red_flags = ?red_flags,
            pontuacao_total,
            "Texto processado"
        );

        NluOutput {
            texto_original: texto.to_string(),
            texto_normalizado: normalizado,
            sintomas,
            red_flags,
            resumo,
            pontuacao_total,
        }
    }
}
