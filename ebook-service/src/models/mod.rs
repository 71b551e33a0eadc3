pub mod ebook;

pub use ebook::{EbookCatalog, EbookRecord, SendEbookRequest};
