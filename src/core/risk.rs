//! # Níveis de Risco e Limiares
//!
//! O sistema classifica cada triagem em um de quatro [`RiskTier`]s,
//! comparando o risco global (maior score entre as condições) com três
//! limiares ascendentes definidos na base de conhecimento.
//!
//! ```text
//! 0.0 ──── baixo ──── médio ──── alto ──── 1.0
//!  Mínimo  │  Baixo   │  Médio   │  Alto
//! ```
//!
//! A comparação é inclusiva (`risco >= limiar`) e feita do nível mais alto
//! para o mais baixo.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

/// Limiar padrão para risco alto.
pub const DEFAULT_ALTO: f64 = 0.75;
/// Limiar padrão para risco médio.
pub const DEFAULT_MEDIO: f64 = 0.40;
/// Limiar padrão para risco baixo.
pub const DEFAULT_BAIXO: f64 = 0.10;

/// Classificação grosseira de urgência.
///
/// Serializado com os rótulos em PT-BR (`"Mínimo"`, `"Baixo"`, `"Médio"`, `"Alto"`),
/// que são os mesmos exibidos ao usuário.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Mínimo")]
    Minimo,
    #[serde(rename = "Baixo")]
    Baixo,
    #[serde(rename = "Médio")]
    Medio,
    #[serde(rename = "Alto")]
    Alto,
}

impl RiskTier {
    /// Rótulo legível do nível.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Minimo => "Mínimo",
            RiskTier::Baixo => "Baixo",
            RiskTier::Medio => "Médio",
            RiskTier::Alto => "Alto",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Três pontos de corte ascendentes (`baixo < medio < alto`) em `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub alto: f64,
    pub medio: f64,
    pub baixo: f64,
}

impl Thresholds {
    /// Cria limiares validados.
    ///
    /// # Erros
    ///
    /// [`ConfigurationError::InvalidThresholds`] se algum valor estiver fora
    /// de `[0, 1]` ou se a ordem `baixo < medio < alto` não for respeitada.
    pub fn new(alto: f64, medio: f64, baixo: f64) -> Result<Self> {
        for (nome, valor) in [("alto", alto), ("medio", medio), ("baixo", baixo)] {
            if !valor.is_finite() || !(0.0..=1.0).contains(&valor) {
                return Err(ConfigurationError::InvalidThresholds(format!(
                    "{nome}={valor} fora de [0, 1]"
                )));
            }
        }
        if !(baixo < medio && medio < alto) {
            return Err(ConfigurationError::InvalidThresholds(format!(
                "esperado baixo < medio < alto, obtido {baixo} / {medio} / {alto}"
            )));
        }
        Ok(Self { alto, medio, baixo })
    }

    /// Classifica um risco global pelos limiares, sem considerar red flags.
    pub fn classify(&self, risco: f64) -> RiskTier {
        if risco >= self.alto {
            RiskTier::Alto
        } else if risco >= self.medio {
            RiskTier::Medio
        } else if risco >= self.baixo {
            RiskTier::Baixo
        } else {
            RiskTier::Minimo
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            alto: DEFAULT_ALTO,
            medio: DEFAULT_MEDIO,
            baixo: DEFAULT_BAIXO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_inclusive_on_cut_points() {
        let t = Thresholds::default();
        assert_eq!(t.classify(0.75), RiskTier::Alto);
        assert_eq!(t.classify(0.40), RiskTier::Medio);
        assert_eq!(t.classify(0.10), RiskTier::Baixo);
        assert_eq!(t.classify(0.09), RiskTier::Minimo);
        assert_eq!(t.classify(0.0), RiskTier::Minimo);
    }

    #[test]
    fn rejects_out_of_order() {
        assert!(Thresholds::new(0.4, 0.75, 0.1).is_err());
        assert!(Thresholds::new(0.75, 0.40, 0.40).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Thresholds::new(1.5, 0.4, 0.1).is_err());
        assert!(Thresholds::new(0.75, 0.4, -0.1).is_err());
        assert!(Thresholds::new(f64::NAN, 0.4, 0.1).is_err());
    }

    #[test]
    fn tier_serializes_with_accents() {
        let json = serde_json::to_string(&RiskTier::Medio).unwrap();
        assert_eq!(json, "\"Médio\"");
        assert_eq!(RiskTier::Minimo.to_string(), "Mínimo");
    }
}
