//! Metadata/action providers.
//!
//! [`MediaProvider`] is the seam between the orchestration core and the
//! external media tool. [`YtDlp`] drives the `yt-dlp` binary; tests plug in
//! scripted providers.

mod parse;
mod ytdlp;

pub use parse::{parse_entry_metadata, parse_playlist, parse_progress_line, PROGRESS_PREFIX};
pub use ytdlp::{AudioOptions, YtDlp};

use crate::error::{MetadataLookupError, OperationError};
use crate::item::{ItemMetadata, WorkItem};
use crate::progress::TransferEvent;

/// Resolves metadata and performs the download for one item.
pub trait MediaProvider {
    /// Best-effort metadata lookup. Failure is non-fatal to the caller.
    fn resolve(&self, item: &WorkItem) -> Result<ItemMetadata, MetadataLookupError>;

    /// Downloads the item, calling `on_event` as the transfer progresses.
    fn perform(
        &self,
        item: &WorkItem,
        on_event: &mut dyn FnMut(TransferEvent),
    ) -> Result<(), OperationError>;
}

/// Playlist listing: a title and its entries in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub title: String,
    pub items: Vec<WorkItem>,
}

impl Playlist {
    /// Entries that carry an identifier and can be downloaded.
    pub fn downloadable(&self) -> usize {
        self.items.iter().filter(|i| i.id().is_some()).count()
    }

    /// Entries without an identifier (deleted or private videos).
    pub fn unavailable(&self) -> usize {
        self.items.len() - self.downloadable()
    }
}
