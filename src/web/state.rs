//! # Estado da Aplicação Web
//!
//! ```text
//! AppState
//!  ├── service: RwLock<Arc<TriageService>>   ← trocado inteiro no reload
//!  └── config:  Arc<AppConfig>
//! ```
//!
//! O `RwLock` só protege a **troca** do handle. Cada requisição clona o
//! `Arc` atual e solta o lock antes de processar; a base em si nunca é
//! modificada.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::AppConfig;
use crate::core::KnowledgeBase;
use crate::error::Result;
use crate::triage::TriageService;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    service: Arc<RwLock<Arc<TriageService>>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service: TriageService, config: AppConfig) -> Self {
        Self {
            service: Arc::new(RwLock::new(Arc::new(service))),
            config: Arc::new(config),
        }
    }

    /// Serviço vigente; o lock é liberado ao retornar.
    pub fn service(&self) -> Arc<TriageService> {
        self.service.read().clone()
    }

    /// Recarrega a base do disco e troca o serviço atomicamente.
    ///
    /// Em caso de erro o serviço anterior continua ativo.
    pub fn reload(&self) -> Result<Arc<TriageService>> {
        let kb = Arc::new(KnowledgeBase::load(&self.config.kb_path)?);
        let mut service = TriageService::new(kb)?;
        if let Some(provider) = self.config.similarity_provider() {
            service = service.with_similarity(provider);
        }
        let service = Arc::new(service);
        *self.service.write() = service.clone();
        tracing::info!(path = %self.config.kb_path.display(), "Base de conhecimento recarregada");
        Ok(service)
    }
}
