//! # Gerador de Resumo da Queixa
//!
//! Seleciona até duas frases do texto **original** que mencionam algum
//! sintoma extraído, para exibição ao usuário. O resumo é puramente
//! cosmético: nunca entra no cálculo de score ou de risco.
//!
//! ## Algoritmo
//!
//! ```text
//! texto original
//!   ├── divide em frases por . ! ?
//!   ├── descarta frases com ≤ 3 caracteres
//!   ├── para cada termo léxico de um sintoma extraído (ordem da base):
//!   │     primeira frase ainda não escolhida que contém o termo
//!   │     (para ao atingir 2 frases)
//!   ├── nenhuma escolhida → primeira frase
//!   └── nenhuma frase     → 100 primeiros caracteres + "..."
//! ```

use std::collections::BTreeMap;

use regex::Regex;

use super::normalizer::normalize;
use crate::core::KnowledgeBase;

/// Máximo de frases no resumo.
const MAX_SENTENCES: usize = 2;

/// Frases com até este número de caracteres são descartadas.
const MIN_SENTENCE_CHARS: usize = 3;

/// Tamanho do recorte usado quando o texto não tem frases aproveitáveis.
const FALLBACK_CHARS: usize = 100;

pub struct SummaryGenerator {
    /// (termo normalizado, sintoma), na ordem da base.
    terms: Vec<(String, String)>,
    sentence_re: Regex,
}

impl SummaryGenerator {
    pub fn new(kb: &KnowledgeBase) -> Self {
        Self {
            terms: kb
                .mappings()
                .iter()
                .map(|m| (m.termo.clone(), m.sintoma.clone()))
                .collect(),
            sentence_re: Regex::new(r"[.!?]\s*").expect("padrão de frase é estático"),
        }
    }

    /// Gera o resumo a partir do texto original e dos sintomas extraídos.
    pub fn summarize(&self, original: &str, sintomas: &BTreeMap<String, f64>) -> String {
        let frases: Vec<&str> = self
            .sentence_re
            .split(original.trim())
            .map(str::trim)
            .filter(|f| f.chars().count() > MIN_SENTENCE_CHARS)
            .collect();
        let frases_norm: Vec<String> = frases.iter().map(|f| normalize(f)).collect();

        let mut escolhidas: Vec<usize> = Vec::new();
        'termos: for (termo, sintoma) in &self.terms {
            if !sintomas.contains_key(sintoma) {
                continue;
            }
            for (i, norm) in frases_norm.iter().enumerate() {
                if norm.contains(termo.as_str()) && !escolhidas.contains(&i) {
                    escolhidas.push(i);
                    if escolhidas.len() >= MAX_SENTENCES {
                        break 'termos;
                    }
                    break;
                }
            }
        }

        if escolhidas.is_empty() {
            return match frases.first() {
                Some(primeira) => primeira.to_string(),
                None => {
                    let recorte: String = original.chars().take(FALLBACK_CHARS).collect();
                    format!("{recorte}...")
                }
            };
        }

        escolhidas
            .iter()
            .map(|&i| frases[i])
            .collect::<Vec<_>>()
            .join(" ")
    }
}
