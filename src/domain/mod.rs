//! Business logic for the return-export pipeline.
//!
//! The pipeline runs in a fixed order per submission:
//! validate → build rows → encode CSV → archive locally → dispatch to
//! remote targets. Everything here is free of HTTP concerns; the `io`
//! layer translates to and from the web.

pub mod archive;
pub mod csv_encoder;
pub mod export_service;
pub mod models;
pub mod row_builder;
pub mod validation;

pub use archive::{ArchiveError, Archiver};
pub use export_service::{DeliveryFailure, ExportError, ExportOutcome, ExportService};
pub use models::{ExportBatch, ExportRow, FormVariant, Submission, COLUMNS};
pub use validation::{validate, ValidationOutcome};
