use crate::model::TreeModel;
use crate::source::ProjectSource;
use crate::tokens::TokenCounter;
use crate::utils::strip_blank_lines;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Separator between the listing, each file block, and the trailing text.
pub const BLOCK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    pub path: String,
    /// Cleaned content, or the inline `Error: ...` text when the fetch failed.
    pub content: String,
    pub failed: bool,
    pub token_count: usize,
}

impl FileBlock {
    pub fn render(&self) -> String {
        format!("File: {}\n{}", self.path, self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    pub text: String,
    pub token_count: usize,
    pub files: Vec<FileBlock>,
}

impl AggregateResult {
    pub fn failed_files(&self) -> impl Iterator<Item = &FileBlock> {
        self.files.iter().filter(|f| f.failed)
    }
}

/// Builds the bundle: tree listing, every selected file, then the user's
/// trailing text, with a token count over the whole thing.
pub struct Aggregator {
    source: Arc<dyn ProjectSource>,
    counter: Arc<dyn TokenCounter>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn ProjectSource>, counter: Arc<dyn TokenCounter>) -> Self {
        Aggregator { source, counter }
    }

    /// Fetches all selected files concurrently. A failed fetch becomes an
    /// inline error for that file only; blocks are assembled by path in
    /// tree order regardless of which fetch settles first.
    pub async fn aggregate(&self, model: &TreeModel, dir: &str, trailing_text: &str) -> AggregateResult {
        let listing = model.listing();
        let selected = model.selected_paths();
        debug!("Aggregating {} selected files from '{}'", selected.len(), dir);

        let fetches = selected.iter().map(|path| {
            let source = self.source.clone();
            async move {
                let fetched = source.fetch(dir, path).await;
                (*path, fetched)
            }
        });

        let files: Vec<FileBlock> = join_all(fetches)
            .await
            .into_iter()
            .map(|(path, fetched)| {
                let (content, failed) = match fetched {
                    Ok(raw) => (strip_blank_lines(&raw), false),
                    Err(e) => {
                        warn!("Failed to fetch {}: {}", path, e);
                        (format!("Error: {}", e), true)
                    }
                };
                let mut block = FileBlock {
                    path: path.to_owned(),
                    content,
                    failed,
                    token_count: 0,
                };
                block.token_count = self.counter.count(&block.render());
                trace!("File {} has {} tokens", path, block.token_count);
                block
            })
            .collect();

        let mut sections: Vec<String> = Vec::with_capacity(files.len() + 2);
        sections.push(listing);
        sections.extend(files.iter().map(FileBlock::render));
        sections.push(trailing_text.to_owned());
        let text = sections.join(BLOCK_SEPARATOR);

        let token_count = self.counter.count(&text);
        info!(
            "Aggregated {} files ({} failed), {} tokens",
            files.len(),
            files.iter().filter(|f| f.failed).count(),
            token_count
        );

        AggregateResult {
            text,
            token_count,
            files,
        }
    }
}
