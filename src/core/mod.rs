//! Core business logic: colors, AMC detection and record resolution

pub mod cache;
pub mod color;
pub mod config;
pub mod detect;
pub mod log;
pub mod reference;
pub mod resolve;
pub mod source;

// Re-export main types for cleaner imports
pub use detect::{AmcLabel, detect_amc_label};
pub use reference::{AmcDataset, FundOverride, FundRecord, ReferenceData};
pub use resolve::{RecordField, ResolvedRecord, resolve};
pub use source::ReferenceProvider;
