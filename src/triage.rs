//! # Serviço de Triagem — Do Texto ao Relatório
//!
//! O [`TriageService`] coordena o pipeline completo para um texto livre,
//! na mesma sequência que qualquer camada de apresentação usaria:
//!
//! ```text
//! texto
//!   ├── NluPipeline::processar_texto     → sintomas, red flags, resumo
//!   ├── fatos = sintomas ∪ red flags
//!   ├── InferenceEngine::inferir(fatos)  → condições, risco, recomendações
//!   └── resumo exibido = resumo NLU, ou relatório de queixas do motor
//! ```
//!
//! ## Lote
//!
//! [`triar_lote`](TriageService::triar_lote) processa vários textos em
//! paralelo com rayon. A base é compartilhada sem lock: cada texto gera
//! seu próprio relatório, e a saída preserva a ordem da entrada.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::core::KnowledgeBase;
use crate::error::Result;
use crate::inference::{InferenceEngine, InferenceResult};
use crate::nlu::similarity::SimilarityProvider;
use crate::nlu::{NluOutput, NluPipeline};

/// Relatório completo de uma triagem.
#[derive(Clone, Debug, Serialize)]
pub struct TriageReport {
    pub id: Uuid,
    pub gerado_em: DateTime<Utc>,
    /// Resumo para exibição: frases do texto ou relatório de queixas.
    pub resumo: String,
    pub nlu: NluOutput,
    /// Fatos efetivamente passados ao motor.
    pub fatos: BTreeSet<String>,
    pub inferencia: InferenceResult,
}

/// NLU + inferência sobre uma única base compartilhada.
pub struct TriageService {
    nlu: NluPipeline,
    engine: InferenceEngine,
}

impl TriageService {
    pub fn new(kb: Arc<KnowledgeBase>) -> Result<Self> {
        Ok(Self {
            nlu: NluPipeline::new(kb.clone())?,
            engine: InferenceEngine::new(kb),
        })
    }

    /// Habilita similaridade aproximada na extração.
    pub fn with_similarity(mut self, provider: Arc<dyn SimilarityProvider>) -> Self {
        self.nlu = self.nlu.with_similarity(provider);
        self
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        self.nlu.knowledge_base()
    }

    pub fn nlu(&self) -> &NluPipeline {
        &self.nlu
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    /// Executa a triagem de um texto.
    pub fn triar(&self, texto: &str) -> TriageReport {
        let nlu = self.nlu.processar_texto(texto);
        let fatos = nlu.facts();
        let inferencia = self.engine.inferir(&fatos);

        let resumo = if nlu.resumo.is_empty() {
            inferencia.relatorio_queixas.clone()
        } else {
            nlu.resumo.clone()
        };

        let report = TriageReport {
            id: Uuid::new_v4(),
            gerado_em: Utc::now(),
            resumo,
            nlu,
            fatos,
            inferencia,
        };
        tracing::info!(
            id = %report.id,
            nivel = %report.inferencia.nivel_risco,
            fatos = report.fatos.len(),
            "Triagem concluída"
        );
        report
    }

    /// Triagem de vários textos em paralelo, preservando a ordem.
    pub fn triar_lote(&self, textos: &[String]) -> Vec<TriageReport> {
        tracing::info!(textos = textos.len(), "Triagem em lote iniciada");
        textos.par_iter().map(|t| self.triar(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::tests::sample_kb;
    use crate::core::RiskTier;
    use crate::nlu::similarity::FuzzySimilarity;

    fn service() -> TriageService {
        TriageService::new(Arc::new(sample_kb())).unwrap()
    }

    #[test]
    fn triage_combines_nlu_and_inference() {
        let r = service().triar("Ando muito triste e cansado. Não durmo direito.");
        assert_eq!(
            r.fatos.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["fadiga", "insônia", "tristeza_persistente"]
        );
        assert_eq!(r.inferencia.top().unwrap().condicao, "depressao");
        // 2.7 / 2.7
        assert_eq!(r.inferencia.nivel_risco, RiskTier::Alto);
        assert_eq!(r.resumo, "Ando muito triste e cansado Não durmo direito");
    }

    #[test]
    fn mapped_red_flag_forces_alto() {
        let r = service().triar("às vezes penso que quero morrer");
        assert!(r.nlu.red_flags.contains("ideacao_suicida"));
        assert_eq!(r.inferencia.nivel_risco, RiskTier::Alto);
    }

    #[test]
    fn blank_text_uses_engine_report() {
        let r = service().triar("");
        assert!(r.fatos.is_empty());
        assert_eq!(r.inferencia.nivel_risco, RiskTier::Minimo);
        assert_eq!(r.resumo, "Nenhum sintoma específico detectado.");
    }

    #[test]
    fn batch_preserves_input_order() {
        let textos: Vec<String> = vec![
            "estou ansioso".into(),
            "nada a relatar hoje".into(),
            "muito triste".into(),
        ];
        let reports = service().triar_lote(&textos);
        assert_eq!(reports.len(), 3);
        for (texto, report) in textos.iter().zip(&reports) {
            assert_eq!(&report.nlu.texto_original, texto);
        }
        assert_eq!(reports[0].inferencia.top().unwrap().condicao, "ansiedade");
        assert!(reports[1].inferencia.resultados.is_empty());
        assert_eq!(reports[2].inferencia.top().unwrap().condicao, "depressao");
    }

    fn bundled_kb() -> Arc<KnowledgeBase> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/base_conhecimento.json");
        Arc::new(KnowledgeBase::load(path).unwrap())
    }

    #[test]
    fn bundled_knowledge_base_loads_and_triages() {
        let kb = bundled_kb();
        assert_eq!(kb.condition_count(), 6);
        for c in kb.conditions() {
            for (s, _) in &c.sintomas {
                assert!(!kb.is_red_flag(s), "{} lista a red flag {s}", c.id);
            }
        }
        let service = TriageService::new(kb).unwrap();

        let r = service.triar("Estou exausto, sobrecarregado no trabalho e sem energia.");
        assert_eq!(r.inferencia.top().unwrap().condicao, "burnout");
        // (1.0 + 0.9 + 0.6) / 3.5
        assert_eq!(r.inferencia.nivel_risco, RiskTier::Medio);

        let r = service.triar("Sou um peso para todos, quero morrer.");
        assert!(r.nlu.red_flags.contains("ideacao_suicida"));
        assert_eq!(r.inferencia.top().unwrap().condicao, "crise_suicida");
        assert_eq!(r.inferencia.nivel_risco, RiskTier::Alto);
    }

    #[test]
    fn fuzzy_near_miss_does_not_raise_red_flag() {
        let service = TriageService::new(bundled_kb())
            .unwrap()
            .with_similarity(Arc::new(FuzzySimilarity::default()));

        let r = service.triar("Hoje planejeii minhas férias.");
        assert!(r.nlu.red_flags.is_empty());
        assert!(!r.fatos.contains("planos_suicidas"), "{:?}", r.fatos);
        assert_ne!(r.inferencia.nivel_risco, RiskTier::Alto);

        // a forma literal continua sendo detectada
        let r = service.triar("Eu planejei tudo.");
        assert!(r.nlu.red_flags.contains("planos_suicidas"));
        assert_eq!(r.inferencia.nivel_risco, RiskTier::Alto);
    }
}
