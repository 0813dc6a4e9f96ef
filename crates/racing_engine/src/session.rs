use racing_logging::{racing_debug, racing_trace};
use tokio::runtime::{Builder, Runtime};

use crate::decode::decode_html;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{FailureKind, FetchError, LoadedPage};

/// An exclusive page-loading session, owned by one worker for one work item.
pub trait BrowserSession: Send {
    fn open(&mut self, url: &str) -> Result<LoadedPage, FetchError>;
}

/// Creates a fresh session per work item.
pub trait SessionFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn BrowserSession>, FetchError>;
}

/// Blocking session over the async fetcher, driven by its own single-threaded runtime.
pub struct HttpSession {
    runtime: Runtime,
    fetcher: ReqwestFetcher,
    pages_loaded: usize,
}

impl HttpSession {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| FetchError::new(FailureKind::SessionSetup, err.to_string()))?;
        let fetcher = {
            let _guard = runtime.enter();
            ReqwestFetcher::new(settings)?
        };
        Ok(Self {
            runtime,
            fetcher,
            pages_loaded: 0,
        })
    }
}

impl BrowserSession for HttpSession {
    fn open(&mut self, url: &str) -> Result<LoadedPage, FetchError> {
        racing_trace!("Loading {}", url);
        let output = self.runtime.block_on(self.fetcher.fetch(url))?;
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        self.pages_loaded += 1;
        Ok(LoadedPage {
            final_url: output.metadata.final_url,
            html: decoded.html,
        })
    }
}

impl Drop for HttpSession {
    fn drop(&mut self) {
        racing_debug!("Closing session after {} page(s)", self.pages_loaded);
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpSessionFactory {
    settings: FetchSettings,
}

impl HttpSessionFactory {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

impl SessionFactory for HttpSessionFactory {
    fn create(&self) -> Result<Box<dyn BrowserSession>, FetchError> {
        Ok(Box::new(HttpSession::new(self.settings.clone())?))
    }
}
