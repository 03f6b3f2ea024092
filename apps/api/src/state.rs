use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::extraction::{TesseractOcr, TextExtractor};
use crate::interview::session::SessionStore;
use crate::jobs::matching::{JobMatcher, KeywordJobMatcher, LlmJobMatcher};
use crate::jobs::sources::{http_client, HttpJobSource, JobSource};
use crate::llm_client::LlmClient;

const OCR_TIMEOUT_SECS: u64 = 60;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
    pub extractor: TextExtractor,
    /// Scraping client (desktop User-Agent, scrape timeout) for job boards and LinkedIn.
    pub http: reqwest::Client,
    /// Queried in configured order.
    pub job_sources: Vec<Arc<dyn JobSource>>,
    /// Pluggable job matcher. Default: LlmJobMatcher. Keyword-only via ENABLE_LLM_MATCHING=false.
    pub matcher: Arc<dyn JobMatcher>,
    pub interviews: SessionStore,
}

impl AppState {
    pub fn new(config: Config, llm: LlmClient) -> Result<Self> {
        let http = http_client(Duration::from_secs(config.scrape_timeout_secs))
            .context("failed to build scraping HTTP client")?;

        let delay = Duration::from_millis(config.scrape_delay_ms);
        let job_sources = config
            .job_sources
            .iter()
            .map(|kind| Arc::new(HttpJobSource::new(*kind, http.clone(), delay)) as Arc<dyn JobSource>)
            .collect();

        let matcher: Arc<dyn JobMatcher> = if config.enable_llm_matching {
            Arc::new(LlmJobMatcher(llm.clone()))
        } else {
            Arc::new(KeywordJobMatcher)
        };

        let ocr = TesseractOcr::new(
            config.tesseract_path.clone(),
            Duration::from_secs(OCR_TIMEOUT_SECS),
        );

        Ok(Self {
            llm,
            extractor: TextExtractor::new(Arc::new(ocr)),
            http,
            job_sources,
            matcher,
            interviews: SessionStore::default(),
            config,
        })
    }
}
