//! zaprun Dojo - Import scan reports into DefectDojo.
//!
//! Reports are uploaded through DefectDojo's `import-scan` endpoint. The scan
//! type DefectDojo should parse a report as is guessed from its file name
//! (see [`determine_scan_type`]).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod scan_type;
pub mod uploader;

pub use error::{DojoError, Result};
pub use scan_type::{determine_scan_type, GENERIC_SCAN_TYPE};
pub use uploader::{DojoClient, UploadResult, UploadStatus};
