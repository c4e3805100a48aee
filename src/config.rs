//! # Configuração por Variáveis de Ambiente
//!
//! | Variável | Padrão | Efeito |
//! |----------|--------|--------|
//! | `TRIAGEM_KB_PATH` | `data/base_conhecimento.json` | Caminho da base de conhecimento |
//! | `TRIAGEM_ADDR` | `0.0.0.0:3000` | Endereço do servidor HTTP |
//! | `TRIAGEM_SIMILARIDADE` | (desligada) | `fuzzy` habilita [`FuzzySimilarity`] |
//! | `TRIAGEM_SIMILARIDADE_LIMIAR` | `0.92` | Limiar da similaridade |
//! | `RUST_LOG` | `info` | Filtro do tracing |

use std::path::PathBuf;
use std::sync::Arc;

use crate::nlu::similarity::{FuzzySimilarity, SimilarityProvider, DEFAULT_FUZZY_THRESHOLD};

/// Caminho padrão da base de conhecimento (relativo à raiz do projeto).
pub const DEFAULT_KB_PATH: &str = "data/base_conhecimento.json";

/// Endereço padrão do servidor.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Modo de similaridade entre termos.
#[derive(Clone, Debug, PartialEq)]
pub enum SimilarityMode {
    Off,
    Fuzzy { threshold: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub kb_path: PathBuf,
    pub addr: String,
    pub similarity: SimilarityMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            kb_path: PathBuf::from(DEFAULT_KB_PATH),
            addr: DEFAULT_ADDR.to_string(),
            similarity: SimilarityMode::Off,
        }
    }
}

impl AppConfig {
    /// Lê a configuração do ambiente do processo.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Lê a configuração de uma função de consulta (testável sem tocar no ambiente).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let kb_path = lookup("TRIAGEM_KB_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.kb_path);
        let addr = lookup("TRIAGEM_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.addr);

        let similarity = match lookup("TRIAGEM_SIMILARIDADE").as_deref().map(str::trim) {
            Some("fuzzy") => {
                let threshold = match lookup("TRIAGEM_SIMILARIDADE_LIMIAR") {
                    None => DEFAULT_FUZZY_THRESHOLD,
                    Some(raw) => raw
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|t| t.is_finite())
                        .unwrap_or_else(|| {
                            tracing::warn!(
                                valor = %raw,
                                "Limiar de similaridade inválido, usando padrão"
                            );
                            DEFAULT_FUZZY_THRESHOLD
                        }),
                };
                SimilarityMode::Fuzzy { threshold }
            }
            None | Some("") | Some("off") => SimilarityMode::Off,
            Some(other) => {
                tracing::warn!(valor = %other, "Modo de similaridade desconhecido, desligado");
                SimilarityMode::Off
            }
        };

        Self {
            kb_path,
            addr,
            similarity,
        }
    }

    /// Provider correspondente ao modo configurado.
    pub fn similarity_provider(&self) -> Option<Arc<dyn SimilarityProvider>> {
        match self.similarity {
            SimilarityMode::Off => None,
            SimilarityMode::Fuzzy { threshold } => {
                Some(Arc::new(FuzzySimilarity::new(threshold)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, AppConfig::default());
        assert!(cfg.similarity_provider().is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("TRIAGEM_KB_PATH", "/etc/triagem/base.json"),
            ("TRIAGEM_ADDR", "127.0.0.1:8080"),
            ("TRIAGEM_SIMILARIDADE", "fuzzy"),
            ("TRIAGEM_SIMILARIDADE_LIMIAR", "0.95"),
        ]));
        assert_eq!(cfg.kb_path, PathBuf::from("/etc/triagem/base.json"));
        assert_eq!(cfg.addr, "127.0.0.1:8080");
        assert_eq!(cfg.similarity, SimilarityMode::Fuzzy { threshold: 0.95 });
        assert_eq!(cfg.similarity_provider().unwrap().threshold(), 0.95);
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("TRIAGEM_SIMILARIDADE", "fuzzy"),
            ("TRIAGEM_SIMILARIDADE_LIMIAR", "alto"),
        ]));
        assert_eq!(
            cfg.similarity,
            SimilarityMode::Fuzzy {
                threshold: DEFAULT_FUZZY_THRESHOLD
            }
        );

        for raw in ["NaN", "inf", "-inf"] {
            let cfg = AppConfig::from_lookup(lookup(&[
                ("TRIAGEM_SIMILARIDADE", "fuzzy"),
                ("TRIAGEM_SIMILARIDADE_LIMIAR", raw),
            ]));
            assert_eq!(
                cfg.similarity,
                SimilarityMode::Fuzzy {
                    threshold: DEFAULT_FUZZY_THRESHOLD
                },
                "{raw}"
            );
        }

        let cfg = AppConfig::from_lookup(lookup(&[("TRIAGEM_SIMILARIDADE", "vetorial")]));
        assert_eq!(cfg.similarity, SimilarityMode::Off);
    }
}
