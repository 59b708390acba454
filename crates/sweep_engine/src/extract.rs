use chrono::Local;
use sweep_core::{try_extract, ArticleContext, ArticleId, ExtractionMismatch, Record};
use sweep_logging::{sweep_error, sweep_info};

pub trait Extractor: Send + Sync {
    fn extract(&self, id: ArticleId, raw: &str, ctx: &ArticleContext) -> Option<Record>;
}

/// Extracts article records using local wall-clock time for dates.
///
/// A missing writer is routine and logged at info; a writer inside an
/// unusable payload is logged as an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArticleExtractor;

impl Extractor for ArticleExtractor {
    fn extract(&self, id: ArticleId, raw: &str, ctx: &ArticleContext) -> Option<Record> {
        match try_extract(id, raw, ctx, Local::now()) {
            Ok(record) => {
                sweep_info!("id {}: extracted article by {}", id, record.author);
                Some(record)
            }
            Err(ExtractionMismatch::TokenAbsent) => {
                sweep_info!("id {}: writer id not found", id);
                None
            }
            Err(err @ ExtractionMismatch::StructureInvalid { .. }) => {
                sweep_error!("id {}: {}", id, err);
                None
            }
        }
    }
}
