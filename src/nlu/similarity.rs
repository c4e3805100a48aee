//! # Similaridade entre Termos — Capacidade Plugável
//!
//! O extrator de sintomas pode, opcionalmente, consultar um
//! [`SimilarityProvider`] para reconhecer variações de um termo que não
//! aparecem literalmente no texto (ex: erro de digitação "trizte").
//!
//! ```text
//! termo léxico sem match literal
//!   └── para cada token do texto:
//!         similarity(token, termo) >= limiar?  → sintoma encontrado
//! ```
//!
//! Matches literais nunca dependem do provider: o resultado para eles é o
//! mesmo com ou sem similaridade habilitada.
//!
//! | Implementação | Backend | Uso |
//! |---------------|---------|-----|
//! | [`FuzzySimilarity`] | Jaro-Winkler (`strsim`) | Tolerância a erros de digitação |

use strsim::jaro_winkler;

/// Comparação semântica/aproximada entre dois termos.
///
/// Retorna `None` quando a capacidade não está disponível para o par
/// (ex: termo fora do vocabulário do modelo).
pub trait SimilarityProvider: Send + Sync {
    /// Similaridade em `[0, 1]`, ou `None` se indisponível.
    fn similarity(&self, a: &str, b: &str) -> Option<f64>;

    /// Similaridade mínima para considerar dois termos equivalentes.
    fn threshold(&self) -> f64;
}

/// Limiar padrão do [`FuzzySimilarity`].
///
/// Alto o bastante para que "triste" não case com "tristonho" (≈ 0.88).
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.92;

/// Similaridade de Jaro-Winkler entre palavras.
///
/// Só compara termos de uma palavra; frases compostas retornam `None`.
/// Palavras com menos de 4 caracteres também retornam `None`: nelas um
/// único caractere diferente já muda o sentido.
#[derive(Clone, Debug)]
pub struct FuzzySimilarity {
    threshold: f64,
}

impl FuzzySimilarity {
    /// Limiar limitado a `[0, 1]`; `NaN` cai no padrão.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_FUZZY_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }
}

impl Default for FuzzySimilarity {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl SimilarityProvider for FuzzySimilarity {
    fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        let single_word = |s: &str| !s.contains(' ') && s.chars().count() >= 4;
        if !single_word(a) || !single_word(b) {
            return None;
        }
        Some(jaro_winkler(a, b))
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}
