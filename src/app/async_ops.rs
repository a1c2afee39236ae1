//! Async operations for the TUI
//!
//! Uses channels to communicate between the sync TUI loop and async tasks.
//! Each command runs in its own task so a slow image never holds up the deck.

use std::sync::Arc;

use image::DynamicImage;
use tokio::sync::mpsc;

use crate::api::wikipedia::WikipediaClient;
use crate::api::{self, ApiResult, ImageProvider};
use crate::feed::{ArticleSource, RefillTicket};
use crate::images::{self, ImageChain};
use crate::models::{Article, Language};

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum AsyncCommand {
    /// Fetch a batch of random articles for the deck
    Prefetch {
        ticket: RefillTicket,
        language: Language,
    },
    /// Run the image resolution chain for an article
    ResolveImage { generation: u64, article: Article },
    /// Download and decode an image
    LoadImage { url: String },
    /// Shutdown the worker
    Shutdown,
}

/// Results sent back from the async worker to the TUI
#[derive(Debug)]
pub enum AsyncResult {
    ArticlesFetched {
        ticket: RefillTicket,
        result: ApiResult<Vec<Article>>,
    },
    ImageResolved {
        generation: u64,
        article_id: String,
        url: Option<String>,
    },
    ImageLoaded {
        url: String,
        image: DynamicImage,
    },
    ImageFailed {
        url: String,
        error: String,
    },
}

/// Channel handles for communicating with the async worker
pub struct AsyncHandle {
    /// Send commands to the worker
    pub cmd_tx: mpsc::Sender<AsyncCommand>,
    /// Receive results from the worker
    pub result_rx: mpsc::Receiver<AsyncResult>,
}

/// Spawn the async worker and return handles.
///
/// Must be called from within a tokio runtime.
pub fn spawn_worker(chain: ImageChain<ImageProvider>) -> AsyncHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<AsyncCommand>(32);
    let (result_tx, result_rx) = mpsc::channel::<AsyncResult>(32);

    let chain = Arc::new(chain);
    let http = api::http_client();

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            let tx = result_tx.clone();
            match cmd {
                AsyncCommand::Shutdown => break,
                AsyncCommand::Prefetch { ticket, language } => {
                    tokio::spawn(async move {
                        handle_prefetch(&tx, ticket, language).await;
                    });
                }
                AsyncCommand::ResolveImage {
                    generation,
                    article,
                } => {
                    let chain = Arc::clone(&chain);
                    tokio::spawn(async move {
                        let url = chain.resolve(&article).await;
                        let _ = tx
                            .send(AsyncResult::ImageResolved {
                                generation,
                                article_id: article.id,
                                url,
                            })
                            .await;
                    });
                }
                AsyncCommand::LoadImage { url } => {
                    let http = http.clone();
                    tokio::spawn(async move {
                        handle_load_image(&tx, &http, url).await;
                    });
                }
            }
        }
    });

    AsyncHandle { cmd_tx, result_rx }
}

async fn handle_prefetch(
    result_tx: &mpsc::Sender<AsyncResult>,
    ticket: RefillTicket,
    language: Language,
) {
    let result = WikipediaClient::new(language).fetch_batch().await;
    if let Err(e) = &result {
        tracing::warn!("Random batch for {} failed: {e}", language.code());
    }
    let _ = result_tx
        .send(AsyncResult::ArticlesFetched { ticket, result })
        .await;
}

async fn handle_load_image(
    result_tx: &mpsc::Sender<AsyncResult>,
    http: &reqwest::Client,
    url: String,
) {
    let msg = match images::fetch_image(http, &url).await {
        Ok(image) => AsyncResult::ImageLoaded { url, image },
        Err(e) => AsyncResult::ImageFailed {
            url,
            error: format!("{e:#}"),
        },
    };
    let _ = result_tx.send(msg).await;
}
