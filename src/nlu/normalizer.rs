//! # Normalizador de Texto
//!
//! Coloca o texto livre em forma canônica antes da busca por termos:
//!
//! ```text
//! "Ando MUITO triste... não durmo!"  →  "ando muito triste não durmo"
//! ```
//!
//! ## Regras
//!
//! 1. Unicode NFC (acentos decompostos viram um único caractere)
//! 2. Lowercase
//! 3. Tudo que não é alfanumérico, `_`, `-` ou espaço vira espaço
//! 4. Espaços consecutivos colapsam, bordas são aparadas
//!
//! Letras acentuadas são alfanuméricas e portanto preservadas.
//! A função é idempotente: `normalize(normalize(t)) == normalize(t)`.

use unicode_normalization::UnicodeNormalization;

/// Normaliza texto bruto para matching.
pub fn normalize(text: &str) -> String {
    let lowered: String = text.nfc().flat_map(char::to_lowercase).nfc().collect();
    let cleaned: String = lowered
        .chars()
        .map(|c| if is_kept(c) { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Caracteres que sobrevivem à normalização (além do espaço).
fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
