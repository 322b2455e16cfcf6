//! Squid page records.

mod decode;
mod json;
mod page;
mod wire;

pub use decode::decode_page;
pub use json::{to_json, JsonFormat, PageDump};
pub use page::{
    Background, BackgroundKind, CropRect, DecodedPage, Delta, ImageItem, Item, Layer, Point,
    Rect, Stroke, StrokeKind,
};
pub use wire::WireError;

use crate::archive::{page_entry, EntryReader};
use crate::error::{Error, Result};

/// Read and decode the record of `page_id`.
pub fn read_page<E: EntryReader + ?Sized>(source: &mut E, page_id: &str) -> Result<DecodedPage> {
    let name = page_entry(page_id);
    let data = source
        .read_entry(&name)
        .map_err(|e| Error::page_decode(page_id, e))?;
    decode_page(&data).map_err(|e| Error::page_decode(page_id, e))
}
