//! Local persistence: the analysis log and the uploaded images

pub mod images;
pub mod records;

pub use images::{decode_upload, ImageStore};
pub use records::{RecordStore, StoreError};
