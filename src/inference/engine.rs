//! # Motor de Inferência Ponderada
//!
//! O [`InferenceEngine`] recebe um conjunto de fatos (sintomas e red flags)
//! e pontua cada condição da [`KnowledgeBase`].
//!
//! ## Score por Condição
//!
//! ```text
//! casados   = sintomas(C) ∩ fatos            (vazio → C fora do resultado)
//! grau      = Σ peso(casados) / Σ peso(sintomas(C))
//! bônus     = 0.3 × Σ peso(r)  para r ∈ fatos ∩ red_flags
//! score     = min(grau + bônus, 1.0)
//! ```
//!
//! O bônus de red flag é calculado **uma vez** por conjunto de fatos e somado
//! a toda condição pontuada, mesmo às que não têm relação com a red flag.
//! Essa contaminação cruzada é mantida e está sinalizada para revisão de
//! produto.
//!
//! ## Nível de Risco
//!
//! ```text
//! red flag crítica nos fatos ou nos resultados?  → Alto
//! senão risco_global >= alto                     → Alto
//!       risco_global >= médio                    → Médio
//!       risco_global >= baixo                    → Baixo
//!       caso contrário                           → Mínimo
//! ```
//!
//! ## Ordenação
//!
//! Resultados ordenados por score decrescente com ordenação **estável**:
//! em empate, vale a ordem das condições na base de conhecimento.
//!
//! ## Exemplo
//!
//! ```text
//! depressao = { tristeza_persistente: 1.0, fadiga: 0.9, insônia: 0.8 }
//! fatos     = { tristeza_persistente, fadiga }
//! grau      = 1.9 / 2.7 ≈ 0.704  → Médio (médio = 0.40, alto = 0.75)
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::recommendations::{build_recommendations, EMPTY_INPUT_RECOMMENDATION};
use crate::core::{KnowledgeBase, RiskTier};

/// Fator aplicado ao peso das red flags presentes.
pub const RED_FLAG_BONUS_FACTOR: f64 = 0.3;

/// Red flags que forçam o nível "Alto" independentemente do score.
pub const CRITICAL_RED_FLAGS: &[&str] = &["ideacao_suicida", "automutilacao", "planos_suicidas"];

/// Relatório fixo para conjunto de fatos vazio.
pub const EMPTY_INPUT_REPORT: &str = "Nenhum sintoma específico detectado.";

/// Quantas queixas comuns entram no relatório.
const MAX_REPORTED_COMPLAINTS: usize = 6;

/// Pontuação de uma condição que casou com pelo menos um fato.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConditionMatch {
    pub condicao: String,
    pub descricao: String,
    /// Sintomas da condição presentes nos fatos, em ordem alfabética.
    pub sintomas_que_casaram: Vec<String>,
    /// Grau de correspondência ponderado, em `(0, 1]`.
    pub grau: f64,
    /// `min(grau + bônus, 1.0)`.
    pub score: f64,
    /// Red flags presentes nos fatos, em ordem alfabética.
    pub red_flags: Vec<String>,
    pub justificativa: String,
}

/// Resultado completo de uma inferência.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InferenceResult {
    pub resultados: Vec<ConditionMatch>,
    pub nivel_risco: RiskTier,
    pub relatorio_queixas: String,
    pub recomendacoes: Vec<String>,
    pub risco_global: f64,
}

impl InferenceResult {
    /// Resultado mínimo e fixo para ausência de fatos.
    pub fn empty() -> Self {
        Self {
            resultados: Vec::new(),
            nivel_risco: RiskTier::Minimo,
            relatorio_queixas: EMPTY_INPUT_REPORT.to_string(),
            recomendacoes: vec![EMPTY_INPUT_RECOMMENDATION.to_string()],
            risco_global: 0.0,
        }
    }

    /// Condição de maior score, se houver.
    pub fn top(&self) -> Option<&ConditionMatch> {
        self.resultados.first()
    }
}

/// Motor de inferência sobre uma base compartilhada e imutável.
///
/// Sem estado próprio além do `Arc` da base: várias inferências podem
/// rodar em paralelo sobre a mesma instância.
#[derive(Clone)]
pub struct InferenceEngine {
    kb: Arc<KnowledgeBase>,
}

impl InferenceEngine {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Inferência a partir de um JSON arbitrário.
    ///
    /// Apenas uma lista de strings é aceita como conjunto de fatos; qualquer
    /// outra forma é tratada como "nenhuma informação" (conjunto vazio).
    pub fn inferir_json(&self, fatos: &Value) -> InferenceResult {
        let coerced: Vec<&str> = match fatos {
            Value::Array(items) => items
                .iter()
                .map(Value::as_str)
                .collect::<Option<Vec<_>>>()
                .unwrap_or_else(|| {
                    tracing::warn!("Fatos com elementos não textuais, tratados como vazio");
                    Vec::new()
                }),
            _ => {
                tracing::warn!("Conjunto de fatos inválido, tratado como vazio");
                Vec::new()
            }
        };
        self.inferir(coerced)
    }

    /// Inferência principal.
    ///
    /// Os fatos são comparados em lowercase; duplicatas colapsam.
    pub fn inferir<I, S>(&self, fatos: I) -> InferenceResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fatos: BTreeSet<String> = fatos
            .into_iter()
            .map(|f| f.as_ref().trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();

        if fatos.is_empty() {
            return InferenceResult::empty();
        }

        // Red flags presentes e bônus: iguais para todas as condições.
        let red_encontradas: Vec<String> = fatos
            .iter()
            .filter(|f| self.kb.is_red_flag(f))
            .cloned()
            .collect();
        let bonus: f64 = red_encontradas
            .iter()
            .filter_map(|r| self.kb.red_flag_weight(r))
            .map(|w| w * RED_FLAG_BONUS_FACTOR)
            .sum();

        let mut resultados = Vec::new();
        for condicao in self.kb.conditions() {
            let mut casados: Vec<String> = condicao
                .sintomas
                .iter()
                .filter(|(s, _)| fatos.contains(s))
                .map(|(s, _)| s.clone())
                .collect();
            if casados.is_empty() {
                continue;
            }
            casados.sort();

            let presentes: f64 = condicao
                .sintomas
                .iter()
                .filter(|(s, _)| fatos.contains(s))
                .map(|(_, w)| w)
                .sum();
            let grau = presentes / condicao.total_weight();
            let score = (grau + bonus).min(1.0);

            let justificativa = build_justification(&condicao.id, &casados, grau, &red_encontradas);
            tracing::debug!(condicao = %condicao.id, grau, score, "Condição pontuada");

            resultados.push(ConditionMatch {
                condicao: condicao.id.clone(),
                descricao: condicao.descricao.clone(),
                sintomas_que_casaram: casados,
                grau,
                score,
                red_flags: red_encontradas.clone(),
                justificativa,
            });
        }

        // sort_by é estável: empates mantêm a ordem da base.
        resultados.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let risco_global = resultados.iter().map(|r| r.score).fold(0.0, f64::max);
        let nivel_risco = self.classify(risco_global, &resultados, &fatos);
        let relatorio_queixas = self.complaint_report(&fatos);
        let recomendacoes = build_recommendations(
            nivel_risco,
            resultados.first().map(|r| r.condicao.as_str()),
            !red_encontradas.is_empty() && resultados.is_empty(),
        );

        tracing::info!(
            fatos = fatos.len(),
            condicoes = resultados.len(),
            risco_global,
            nivel = %nivel_risco,
            "Inferência concluída"
        );

        InferenceResult {
            resultados,
            nivel_risco,
            relatorio_queixas,
            recomendacoes,
            risco_global,
        }
    }

    /// Nível de risco com precedência da red flag crítica sobre os limiares.
    fn classify(
        &self,
        risco_global: f64,
        resultados: &[ConditionMatch],
        fatos: &BTreeSet<String>,
    ) -> RiskTier {
        let critica_nos_fatos = CRITICAL_RED_FLAGS.iter().any(|rf| fatos.contains(*rf));
        let critica_nos_resultados = resultados
            .iter()
            .any(|r| r.red_flags.iter().any(|rf| CRITICAL_RED_FLAGS.contains(&rf.as_str())));

        if critica_nos_fatos || critica_nos_resultados {
            tracing::warn!(risco_global, "Red flag crítica presente, nível forçado para Alto");
            return RiskTier::Alto;
        }
        self.kb.thresholds().classify(risco_global)
    }

    /// Relatório textual das queixas: sintomas comuns e red flags em destaque.
    fn complaint_report(&self, fatos: &BTreeSet<String>) -> String {
        let (red, comuns): (Vec<&String>, Vec<&String>) =
            fatos.iter().partition(|f| self.kb.is_red_flag(f));

        let mut relatorio = String::new();
        if !comuns.is_empty() {
            let partes: Vec<String> = comuns
                .iter()
                .take(MAX_REPORTED_COMPLAINTS)
                .map(|f| humanize(f))
                .collect();
            relatorio = format!("Queixas principais: {}.", partes.join(", "));
        }
        if !red.is_empty() {
            let rf = red.iter().map(|f| humanize(f)).collect::<Vec<_>>().join(", ");
            if relatorio.is_empty() {
                relatorio = format!("🚨 ATENÇÃO: {rf}.");
            } else {
                relatorio.push_str(&format!(" 🚨 ATENÇÃO: {rf}."));
            }
        }
        relatorio
    }
}

/// Identificador → texto legível (`tristeza_persistente` → `tristeza persistente`).
fn humanize(id: &str) -> String {
    id.replace('_', " ")
}

/// Primeira letra maiúscula, restante minúsculo.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn build_justification(condicao: &str, casados: &[String], grau: f64, red: &[String]) -> String {
    let mut partes = vec![format!("Condição considerada: {}.", capitalize(condicao))];

    if !casados.is_empty() {
        let lista = casados.iter().map(|s| humanize(s)).collect::<Vec<_>>().join(", ");
        partes.push(format!("Sinais compatíveis: {lista}."));
        partes.push(format!("Grau de correspondência: {:.1}%.", grau * 100.0));
    }
    if !red.is_empty() {
        let rf = red.iter().map(|r| humanize(r)).collect::<Vec<_>>().join(", ");
        partes.push(format!("RED-FLAGS identificadas: {rf}."));
    }
    partes.join(" ")
}
