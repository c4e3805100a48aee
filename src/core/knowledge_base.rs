//! # KnowledgeBase — Regras Declarativas da Triagem
//!
//! A [`KnowledgeBase`] é o **conjunto de regras** que guia toda a triagem:
//! quais condições existem, quais sintomas as compõem (com pesos), quais
//! termos são red flags e como frases do texto livre viram sintomas.
//!
//! ## Formato do Documento
//!
//! ```json
//! {
//!   "config":    { "thresholds": { "alto_risco": 0.75, "medio_risco": 0.40, "baixo_risco": 0.10 } },
//!   "red_flags": { "ideacao_suicida": 1.0, "automutilacao": 1.0 },
//!   "mappings":  { "triste": "tristeza_persistente", "não durmo": "insônia" },
//!   "condicoes": {
//!     "depressao": {
//!       "descricao": "Humor deprimido, perda de prazer e energia",
//!       "sintomas": { "tristeza_persistente": 1.0, "fadiga": 0.9, "insônia": 0.8 }
//!     }
//!   }
//! }
//! ```
//!
//! `red_flags` também aceita uma lista simples (`["ideacao_suicida"]`), caso
//! em que cada red flag recebe peso 1.0.
//!
//! ## Normalização no Carregamento
//!
//! - Identificadores de condições, sintomas e red flags → lowercase
//! - Termos léxicos → [`normalize`](crate::nlu::normalizer::normalize), para
//!   serem comparáveis ao texto normalizado
//! - A **ordem de inserção** das condições e dos mapeamentos é preservada:
//!   ela é o critério de desempate do ranking
//!
//! ## Imutabilidade
//!
//! Depois de construída, a base nunca é alterada. É compartilhada via
//! `Arc<KnowledgeBase>` entre chamadas concorrentes sem nenhum lock.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::risk::{Thresholds, DEFAULT_ALTO, DEFAULT_BAIXO, DEFAULT_MEDIO};
use crate::error::{ConfigurationError, Result};
use crate::nlu::normalizer::normalize;

/// Condição psicológica candidata, com seu perfil de sintomas ponderados.
#[derive(Clone, Debug, Serialize)]
pub struct Condition {
    /// Identificador normalizado (ex: `depressao`).
    pub id: String,
    /// Descrição livre.
    pub descricao: String,
    /// Sintoma → peso em `(0, 1]`, na ordem do documento.
    pub sintomas: Vec<(String, f64)>,
}

impl Condition {
    /// Soma de todos os pesos — denominador do grau de correspondência.
    ///
    /// Sempre positiva para condições vindas de [`KnowledgeBase`].
    pub fn total_weight(&self) -> f64 {
        self.sintomas.iter().map(|(_, w)| w).sum()
    }

    /// Peso de um sintoma, se fizer parte do perfil.
    pub fn weight_of(&self, sintoma: &str) -> Option<f64> {
        self.sintomas
            .iter()
            .find(|(s, _)| s == sintoma)
            .map(|(_, w)| *w)
    }
}

/// Termo de superfície → sintoma normalizado.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LexicalMapping {
    pub termo: String,
    pub sintoma: String,
}

/// Base de conhecimento validada e imutável.
#[derive(Debug)]
pub struct KnowledgeBase {
    conditions: Vec<Condition>,
    condition_index: HashMap<String, usize>,
    red_flags: Vec<(String, f64)>,
    red_flag_index: HashMap<String, f64>,
    mappings: Vec<LexicalMapping>,
    thresholds: Thresholds,
}

impl KnowledgeBase {
    /// Carrega a base de um arquivo JSON.
    ///
    /// # Erros
    ///
    /// - [`ConfigurationError::NotFound`] se o arquivo não existir
    /// - [`ConfigurationError::Io`] se a leitura falhar
    /// - qualquer erro de [`from_json_str`](KnowledgeBase::from_json_str)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigurationError::NotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            condicoes = kb.condition_count(),
            red_flags = kb.red_flag_count(),
            mappings = kb.mapping_count(),
            "Base de conhecimento carregada"
        );
        Ok(kb)
    }

    /// Constrói a base a partir de um documento JSON em memória.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawKb = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Valida o documento lido e aplica lowercase, normalização de termos
    /// e colapso de chaves duplicadas.
    fn from_raw(raw: RawKb) -> Result<Self> {
        let thresholds = raw
            .config
            .and_then(|c| c.thresholds)
            .unwrap_or_default()
            .validate()?;

        let mut red_flags: Vec<(String, f64)> = Vec::new();
        match raw.red_flags {
            None => {}
            Some(RawRedFlags::Weighted(Entries(entries))) => {
                for (id, w) in entries {
                    let weight = check_weight(w, &format!("red_flags.{id}"))?;
                    upsert(&mut red_flags, id.to_lowercase(), weight, "red_flags");
                }
            }
            Some(RawRedFlags::List(ids)) => {
                for id in ids {
                    upsert(&mut red_flags, id.to_lowercase(), 1.0, "red_flags");
                }
            }
        }
        let red_flag_index: HashMap<String, f64> = red_flags.iter().cloned().collect();

        let mut mappings: Vec<(String, String)> = Vec::new();
        for (termo, sintoma) in raw.mappings.map(|e| e.0).unwrap_or_default() {
            let termo_norm = normalize(&termo);
            if termo_norm.is_empty() {
                tracing::warn!(termo = %termo, "Termo léxico vazio após normalização, ignorado");
                continue;
            }
            upsert(&mut mappings, termo_norm, sintoma.to_lowercase(), "mappings");
        }

        let mut conditions: Vec<(String, Condition)> = Vec::new();
        for (nome, bloco) in raw.condicoes.map(|e| e.0).unwrap_or_default() {
            let id = nome.to_lowercase();
            let mut sintomas: Vec<(String, f64)> = Vec::new();
            for (s, w) in bloco.sintomas.map(|e| e.0).unwrap_or_default() {
                let weight = check_weight(w, &format!("condicoes.{nome}.sintomas.{s}"))?;
                let s = s.to_lowercase();
                if red_flag_index.contains_key(&s) {
                    tracing::warn!(
                        condicao = %id,
                        sintoma = %s,
                        "Red flag listada como sintoma: seu peso conta duas vezes"
                    );
                }
                upsert(&mut sintomas, s, weight, "condicoes.sintomas");
            }

            let condition = Condition {
                id: id.clone(),
                descricao: bloco.descricao.unwrap_or_default(),
                sintomas,
            };
            if condition.total_weight() <= 0.0 {
                return Err(ConfigurationError::ZeroWeightSum(id));
            }
            upsert(&mut conditions, id, condition, "condicoes");
        }
        let conditions: Vec<Condition> = conditions.into_iter().map(|(_, c)| c).collect();

        let condition_index = conditions
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        Ok(Self {
            conditions,
            condition_index,
            red_flags,
            red_flag_index,
            mappings: mappings
                .into_iter()
                .map(|(termo, sintoma)| LexicalMapping { termo, sintoma })
                .collect(),
            thresholds,
        })
    }

    /// Todas as condições, na ordem do documento.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Busca uma condição por identificador (case-insensitive).
    pub fn condition(&self, id: &str) -> Option<&Condition> {
        self.condition_index
            .get(&id.to_lowercase())
            .map(|&i| &self.conditions[i])
    }

    /// Identificadores das condições, na ordem do documento.
    pub fn condition_ids(&self) -> Vec<&str> {
        self.conditions.iter().map(|c| c.id.as_str()).collect()
    }

    /// Red flags e seus pesos, na ordem do documento.
    pub fn red_flags(&self) -> &[(String, f64)] {
        &self.red_flags
    }

    /// Peso de uma red flag, se existir.
    pub fn red_flag_weight(&self, id: &str) -> Option<f64> {
        self.red_flag_index.get(id).copied()
    }

    pub fn is_red_flag(&self, id: &str) -> bool {
        self.red_flag_index.contains_key(id)
    }

    /// Mapeamentos léxicos, na ordem do documento.
    pub fn mappings(&self) -> &[LexicalMapping] {
        &self.mappings
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    pub fn red_flag_count(&self) -> usize {
        self.red_flags.len()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }
}

// ─── Documento bruto ───────────────────────────────────────────

#[derive(Deserialize)]
struct RawKb {
    config: Option<RawConfig>,
    red_flags: Option<RawRedFlags>,
    mappings: Option<Entries<String>>,
    condicoes: Option<Entries<RawCondition>>,
}

#[derive(Deserialize)]
struct RawConfig {
    thresholds: Option<RawThresholds>,
}

#[derive(Default, Deserialize)]
struct RawThresholds {
    alto_risco: Option<f64>,
    medio_risco: Option<f64>,
    baixo_risco: Option<f64>,
}

impl RawThresholds {
    fn validate(self) -> Result<Thresholds> {
        Thresholds::new(
            self.alto_risco.unwrap_or(DEFAULT_ALTO),
            self.medio_risco.unwrap_or(DEFAULT_MEDIO),
            self.baixo_risco.unwrap_or(DEFAULT_BAIXO),
        )
    }
}

/// `red_flags` como mapa de pesos ou como lista simples (peso 1.0).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRedFlags {
    Weighted(Entries<f64>),
    List(Vec<String>),
}

#[derive(Deserialize)]
struct RawCondition {
    descricao: Option<String>,
    sintomas: Option<Entries<f64>>,
}

/// Objeto JSON lido como lista de pares, na ordem do documento e com
/// chaves repetidas preservadas para o colapso posterior.
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("um objeto JSON")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// Confere que um peso está em `(0, 1]`.
fn check_weight(w: f64, context: &str) -> Result<f64> {
    if !w.is_finite() || w <= 0.0 || w > 1.0 {
        return Err(ConfigurationError::InvalidWeight {
            context: context.to_string(),
            value: w.to_string(),
        });
    }
    Ok(w)
}

/// Insere preservando a posição da primeira ocorrência da chave.
fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V, section: &str) {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
        tracing::warn!(section, chave = %key, "Chave duplicada após lowercase, valor substituído");
        slot.1 = value;
    } else {
        entries.push((key, value));
    }
}
