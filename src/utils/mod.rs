pub mod errors;
pub mod format;

pub use errors::{
    classify_code, handle_error, Category, Classify, ErrorContext, ErrorLog, HandleOptions,
    HandledError, Severity,
};
