//! # Extratores — Sintomas e Red Flags por Mapeamento Léxico
//!
//! Dois extratores compartilham a mesma regra de busca:
//!
//! - [`SymptomExtractor`] — termo léxico → sintoma, com contagem de ocorrências
//! - [`RedFlagDetector`] — termo associado → identificador de red flag
//!
//! ## Regra de Fronteira de Palavra
//!
//! Um termo só casa como **palavra ou frase inteira** (`\b termo \b`, com
//! fronteiras Unicode):
//!
//! | Texto normalizado | Termo | Casa? |
//! |-------------------|-------|-------|
//! | `ando triste hoje` | `triste` | ✅ |
//! | `triste-feliz` | `triste` | ✅ (hífen é fronteira) |
//! | `ando tristonho` | `triste` | ❌ |
//! | `eu não durmo bem` | `não durmo` | ✅ (frase inteira) |
//! | `não durmobem` | `não durmo` | ❌ |
//!
//! Os padrões são compilados uma única vez, na construção do extrator.
//!
//! ## Contagem
//!
//! Cada termo léxico distinto encontrado soma `1.0` ao seu sintoma, não
//! importa quantas vezes apareça. Vários termos para o mesmo sintoma acumulam.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use regex::Regex;

use super::normalizer::normalize;
use super::similarity::SimilarityProvider;
use crate::core::KnowledgeBase;
use crate::error::{ConfigurationError, Result};

/// Termo compilado para busca com fronteira de palavra.
#[derive(Debug)]
struct TermPattern {
    termo: String,
    alvo: String,
    regex: Regex,
}

impl TermPattern {
    fn compile(termo: &str, alvo: &str) -> Result<Self> {
        let regex = Regex::new(&format!(r"\b{}\b", regex::escape(termo))).map_err(|source| {
            ConfigurationError::Pattern {
                term: termo.to_string(),
                source,
            }
        })?;
        Ok(Self {
            termo: termo.to_string(),
            alvo: alvo.to_string(),
            regex,
        })
    }

    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Extrai sintomas de texto normalizado usando os mapeamentos da base.
///
/// ## Exemplo de Uso
///
/// ```rust
/// use triagem_mental::core::KnowledgeBase;
/// use triagem_mental::nlu::extractor::SymptomExtractor;
///
/// let kb = KnowledgeBase::from_json_str(r#"{
///     "mappings": { "triste": "tristeza_persistente", "chorando": "tristeza_persistente" }
/// }"#).unwrap();
/// let extractor = SymptomExtractor::new(&kb).unwrap();
///
/// let sintomas = extractor.extract("ando triste e chorando muito triste");
/// assert_eq!(sintomas.get("tristeza_persistente"), Some(&2.0));
/// ```
pub struct SymptomExtractor {
    patterns: Vec<TermPattern>,
    /// Índices dos padrões elegíveis para similaridade (alvo não é red flag).
    fuzzy_candidates: Vec<usize>,
    similarity: Option<Arc<dyn SimilarityProvider>>,
}

impl SymptomExtractor {
    /// Compila um padrão por mapeamento léxico, na ordem da base.
    pub fn new(kb: &KnowledgeBase) -> Result<Self> {
        let patterns = kb
            .mappings()
            .iter()
            .map(|m| TermPattern::compile(&m.termo, &m.sintoma))
            .collect::<Result<Vec<_>>>()?;
        let fuzzy_candidates = patterns
            .iter()
            .enumerate()
            .filter(|(_, p)| !kb.is_red_flag(&p.alvo))
            .map(|(i, _)| i)
            .collect();
        Ok(Self {
            patterns,
            fuzzy_candidates,
            similarity: None,
        })
    }

    /// Habilita a busca aproximada para termos sem match literal.
    pub fn with_similarity(mut self, provider: Arc<dyn SimilarityProvider>) -> Self {
        self.similarity = Some(provider);
        self
    }

    /// Sintoma → número de termos léxicos distintos encontrados.
    ///
    /// Função total: texto sem nenhum termo retorna mapa vazio.
    pub fn extract(&self, normalized: &str) -> BTreeMap<String, f64> {
        let mut encontrados: BTreeMap<String, f64> = BTreeMap::new();
        if normalized.is_empty() {
            return encontrados;
        }

        for pattern in self.patterns.iter().filter(|p| p.is_match(normalized)) {
            *encontrados.entry(pattern.alvo.clone()).or_insert(0.0) += 1.0;
        }

        // Similaridade só completa sintomas sem nenhum match literal,
        // no máximo uma vez por sintoma, e nunca produz red flags.
        if self.similarity.is_some() {
            let tokens: Vec<&str> = normalized.split(' ').collect();
            for pattern in self.fuzzy_candidates.iter().map(|&i| &self.patterns[i]) {
                if encontrados.contains_key(&pattern.alvo) {
                    continue;
                }
                if self.similar_token(&pattern.termo, &tokens) {
                    tracing::debug!(
                        termo = %pattern.termo,
                        sintoma = %pattern.alvo,
                        "Termo reconhecido por similaridade"
                    );
                    encontrados.insert(pattern.alvo.clone(), 1.0);
                }
            }
        }
        encontrados
    }

    fn similar_token(&self, termo: &str, tokens: &[&str]) -> bool {
        let Some(provider) = &self.similarity else {
            return false;
        };
        tokens.iter().any(|token| {
            provider
                .similarity(token, termo)
                .is_some_and(|sim| sim >= provider.threshold())
        })
    }
}

/// Detecta red flags em texto normalizado.
///
/// Cada red flag é procurada pelos seus **termos associados**:
///
/// - o próprio identificador (`ideacao_suicida`)
/// - o identificador com espaços (`ideacao suicida`)
/// - todo termo léxico mapeado para ele (`quero morrer` → `ideacao_suicida`)
pub struct RedFlagDetector {
    patterns: Vec<TermPattern>,
}

impl RedFlagDetector {
    pub fn new(kb: &KnowledgeBase) -> Result<Self> {
        let mut patterns = Vec::new();
        for (id, _) in kb.red_flags() {
            let mut termos: Vec<String> = vec![normalize(id), normalize(&id.replace('_', " "))];
            termos.extend(
                kb.mappings()
                    .iter()
                    .filter(|m| m.sintoma == *id)
                    .map(|m| m.termo.clone()),
            );
            let mut seen = BTreeSet::new();
            for termo in termos {
                if termo.is_empty() || !seen.insert(termo.clone()) {
                    continue;
                }
                patterns.push(TermPattern::compile(&termo, id)?);
            }
        }
        Ok(Self { patterns })
    }

    /// Conjunto (ordenado) das red flags presentes no texto.
    pub fn detect(&self, normalized: &str) -> BTreeSet<String> {
        self.patterns
            .iter()
            .filter(|p| p.is_match(normalized))
            .map(|p| p.alvo.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::tests::sample_kb;
    use crate::nlu::similarity::FuzzySimilarity;

    fn extractor() -> SymptomExtractor {
        SymptomExtractor::new(&sample_kb()).unwrap()
    }

    // ─── fronteira de palavra ──────────────────────────────────

    #[test]
    fn term_does_not_match_inside_longer_word() {
        let s = extractor().extract("ando tristonho ultimamente");
        assert!(s.get("tristeza_persistente").is_none(), "{s:?}");
    }

    #[test]
    fn term_matches_between_boundaries_and_punctuation() {
        let ex = extractor();
        assert_eq!(ex.extract("triste").get("tristeza_persistente"), Some(&1.0));
        assert_eq!(ex.extract("muito triste hoje").get("tristeza_persistente"), Some(&1.0));
        assert_eq!(ex.extract("triste-feliz").get("tristeza_persistente"), Some(&1.0));
        assert_eq!(
            ex.extract(&normalize("Triste, sempre.")).get("tristeza_persistente"),
            Some(&1.0)
        );
    }

    #[test]
    fn accented_phrase_matches_as_unit() {
        let ex = extractor();
        assert_eq!(ex.extract("eu não durmo bem").get("insônia"), Some(&1.0));
        assert!(ex.extract("eu não durmobem").get("insônia").is_none());
        assert_eq!(ex.extract("sinto o coração acelerado").get("taquicardia"), Some(&1.0));
    }

    // ─── contagem ──────────────────────────────────────────────

    #[test]
    fn counts_distinct_terms_not_occurrences() {
        let s = extractor().extract("triste triste triste");
        assert_eq!(s.get("tristeza_persistente"), Some(&1.0));
    }

    #[test]
    fn terms_for_same_symptom_accumulate() {
        let s = extractor().extract("triste e com tristeza e cansado");
        assert_eq!(s.get("tristeza_persistente"), Some(&2.0));
        assert_eq!(s.get("fadiga"), Some(&1.0));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn unmatched_text_yields_empty() {
        assert!(extractor().extract("hoje o dia está bonito").is_empty());
        assert!(extractor().extract("").is_empty());
    }

    // ─── similaridade ──────────────────────────────────────────

    #[test]
    fn similarity_recognizes_typos() {
        let ex = extractor().with_similarity(Arc::new(FuzzySimilarity::default()));
        assert_eq!(ex.extract("estou cansadoo").get("fadiga"), Some(&1.0));
    }

    #[test]
    fn literal_matches_are_identical_with_or_without_similarity() {
        let plain = extractor();
        let fuzzy = extractor().with_similarity(Arc::new(FuzzySimilarity::default()));
        for text in ["muito triste e cansado", "não durmo", "coração acelerado e ansioso"] {
            assert_eq!(plain.extract(text), fuzzy.extract(text), "{text}");
        }
        assert!(fuzzy.extract("ando tristonho").get("tristeza_persistente").is_none());
    }

    /// Provider sem vocabulário: nunca tem similaridade disponível.
    struct Unavailable;

    impl SimilarityProvider for Unavailable {
        fn similarity(&self, _a: &str, _b: &str) -> Option<f64> {
            None
        }

        fn threshold(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn unavailable_similarity_behaves_like_none() {
        let plain = extractor();
        let stub = extractor().with_similarity(Arc::new(Unavailable));
        let textos = [
            "muito triste e cansado",
            "estou cansadoo",
            "trizte",
            "hoje o dia está bonito",
            "",
        ];
        for text in textos {
            assert_eq!(plain.extract(text), stub.extract(text), "{text}");
        }
    }

    #[test]
    fn similarity_never_yields_red_flags() {
        let kb = KnowledgeBase::from_json_str(
            r#"{
                "red_flags": ["planos_suicidas"],
                "mappings": { "planejei": "planos_suicidas", "cansado": "fadiga" }
            }"#,
        )
        .unwrap();
        let ex = SymptomExtractor::new(&kb)
            .unwrap()
            .with_similarity(Arc::new(FuzzySimilarity::default()));

        let s = ex.extract("planejeii e cansadoo");
        assert_eq!(s.get("fadiga"), Some(&1.0));
        assert!(s.get("planos_suicidas").is_none(), "{s:?}");
        // o match literal do termo continua valendo
        assert_eq!(ex.extract("planejei tudo").get("planos_suicidas"), Some(&1.0));
    }

    // ─── red flags ─────────────────────────────────────────────

    #[test]
    fn detects_red_flags_by_identifier_and_mapping() {
        let det = RedFlagDetector::new(&sample_kb()).unwrap();
        let flags = det.detect("às vezes eu quero morrer");
        assert_eq!(flags.into_iter().collect::<Vec<_>>(), vec!["ideacao_suicida"]);

        let flags = det.detect("relato de automutilacao e isolamento extremo");
        assert_eq!(
            flags.into_iter().collect::<Vec<_>>(),
            vec!["automutilacao", "isolamento_extremo"]
        );
    }

    #[test]
    fn red_flags_respect_word_boundaries() {
        let det = RedFlagDetector::new(&sample_kb()).unwrap();
        assert!(det.detect("automutilacaoes").is_empty());
        assert!(det.detect("nada de grave").is_empty());
    }
}
