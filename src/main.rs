//! # Triagem Mental — Servidor
//!
//! **Ponto de entrada** do servidor HTTP de triagem.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (RUST_LOG, padrão info)
//!   ├── Lê AppConfig do ambiente
//!   ├── Carrega a base de conhecimento (erro aqui é fatal)
//!   ├── Cria TriageService (+ similaridade, se configurada)
//!   ├── Monta AppState e Router
//!   └── Inicia servidor TCP
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! cargo run
//! RUST_LOG=debug TRIAGEM_SIMILARIDADE=fuzzy cargo run
//! curl -X POST localhost:3000/triagem -H 'content-type: application/json' \
//!      -d '{"texto": "não durmo e ando muito ansioso"}'
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use triagem_mental::config::AppConfig;
use triagem_mental::core::KnowledgeBase;
use triagem_mental::triage::TriageService;
use triagem_mental::web::{self, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🩺 Triagem Mental — Starting...");

    let config = AppConfig::from_env();

    // Sem base válida não há triagem possível.
    let kb = KnowledgeBase::load(&config.kb_path)
        .with_context(|| format!("carregando base de {}", config.kb_path.display()))?;

    let mut service = TriageService::new(Arc::new(kb))?;
    if let Some(provider) = config.similarity_provider() {
        tracing::info!(limiar = provider.threshold(), "Similaridade aproximada habilitada");
        service = service.with_similarity(provider);
    }

    let addr = config.addr.clone();
    let app = web::create_router(AppState::new(service, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind em {addr}"))?;
    tracing::info!("🚀 Server running at http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
