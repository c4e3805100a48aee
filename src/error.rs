//! # Erros de Configuração
//!
//! Toda falha ao carregar ou validar a base de conhecimento é reportada
//! como [`ConfigurationError`]. Sem uma base válida o sistema não opera,
//! então estes erros são **fatais** na inicialização.
//!
//! A extração e a inferência nunca falham: nenhum texto ou conjunto de
//! fatos produz erro, apenas estruturas vazias.

use std::path::PathBuf;

use thiserror::Error;

/// Erro de carregamento/validação da base de conhecimento.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Arquivo da base não existe no caminho informado.
    #[error("Base de conhecimento não encontrada: {0}")]
    NotFound(PathBuf),

    /// Falha de I/O ao ler o arquivo.
    #[error("Falha ao ler {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Documento não é JSON válido ou tem seção com formato inesperado
    /// (ex: `condicoes` não é objeto).
    #[error("JSON inválido na base de conhecimento: {0}")]
    Json(#[from] serde_json::Error),

    /// Peso fora de (0, 1] ou não numérico.
    #[error("Peso inválido em `{context}`: {value}")]
    InvalidWeight { context: String, value: String },

    /// Condição sem sintomas ou com soma de pesos zero.
    #[error("Condição `{0}` tem soma de pesos de sintomas igual a zero")]
    ZeroWeightSum(String),

    /// Limiares de risco fora de [0, 1] ou fora de ordem.
    #[error("Limiares de risco inválidos: {0}")]
    InvalidThresholds(String),

    /// Termo léxico que não pôde ser compilado em padrão de busca.
    #[error("Termo léxico inválido `{term}`: {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
