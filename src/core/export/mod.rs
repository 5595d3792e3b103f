//! Export orchestration
//!
//! This module provides the core export logic:
//! - Export coordination and orchestration
//! - Summary and reporting

pub mod coordinator;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use summary::{ExportError, ExportErrorType, ExportOutcome, ExportSummary};
