//! Browser automation capability

use async_trait::async_trait;

use crate::error::E2eResult;

/// One open page in one browser.
///
/// Selectors are resolved on every call, so nothing is bound to the DOM of a
/// previous navigation.
#[async_trait]
pub trait BrowserSession: Send {
    /// Load `url` and wait for it to finish loading
    async fn goto(&mut self, url: &str) -> E2eResult<()>;

    /// Replace the value of the input matched by `selector`
    async fn fill(&mut self, selector: &str, value: &str) -> E2eResult<()>;

    async fn click(&mut self, selector: &str) -> E2eResult<()>;

    /// Text content of the element matched by `selector`
    async fn text_content(&mut self, selector: &str) -> E2eResult<Option<String>>;

    /// Release the browser. Calling it twice is a no-op.
    async fn close(&mut self) -> E2eResult<()>;
}

#[async_trait]
impl<S: BrowserSession + ?Sized> BrowserSession for Box<S> {
    async fn goto(&mut self, url: &str) -> E2eResult<()> {
        (**self).goto(url).await
    }

    async fn fill(&mut self, selector: &str, value: &str) -> E2eResult<()> {
        (**self).fill(selector, value).await
    }

    async fn click(&mut self, selector: &str) -> E2eResult<()> {
        (**self).click(selector).await
    }

    async fn text_content(&mut self, selector: &str) -> E2eResult<Option<String>> {
        (**self).text_content(selector).await
    }

    async fn close(&mut self) -> E2eResult<()> {
        (**self).close().await
    }
}

/// Opens a fresh session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: BrowserSession;

    async fn open(&self) -> E2eResult<Self::Session>;
}
