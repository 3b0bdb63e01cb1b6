//! Runs the external analysis tool and decodes what it prints.
//!
//! [`Analyzer`] is the seam between the request pipeline and the subprocess;
//! [`CommandAnalyzer`] is the real implementation and tests substitute stubs.

mod decode;
mod error;
mod invoke;

pub use decode::{AnalysisResult, decode};
pub use error::{Error, Result};
pub use invoke::{Analyzer, CommandAnalyzer, RawOutput};
