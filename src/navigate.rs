//! Opening the composed issue URL.

use crate::error::{HelperError, Result};

/// Where a composed "new issue" URL goes.
pub trait Navigator: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs in the system browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn open(&self, url: &str) -> Result<()> {
        tracing::info!("opening new issue page in browser");
        open::that(url).map_err(|e| HelperError::Browser(e.to_string()))
    }
}

/// Leaves the URL for the caller to print.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn open(&self, _url: &str) -> Result<()> {
        tracing::debug!("browser disabled, not opening url");
        Ok(())
    }
}
