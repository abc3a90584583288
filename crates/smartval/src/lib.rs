//! # smartval
//!
//! Declarative validation and coercion for loosely-typed records. Each
//! field declares a pipe-separated rule spec; the engine runs the rules
//! left to right, coercing and sanitizing as it goes, and stops at the
//! first failure.
//!
//! ## Example
//!
//! ```rust,ignore
//! use smartval::prelude::*;
//!
//! let rules = RuleTable::new()
//!     .field("username", "string|required|min:6")
//!     .field("email", "email|required")
//!     .field("age", "int|required|min:18")
//!     .field("date_of_birth", "required|format:Y-m-d|before:2000-01-01,Y-m-d");
//!
//! let validator = SmartValidator::new(&json!({
//!     "username": "john_doe",
//!     "email": "john@example.com",
//!     "age": "30",
//!     "date_of_birth": "1990-01-01",
//! }), &rules)?;
//!
//! assert_eq!(validator.validated().get_as::<i64>("age"), Some(30));
//! ```
//!
//! ## Rules
//!
//! Without a parameter:
//!
//! - `string` - Sanitize special characters to numeric entities
//! - `int`, `float`, `bool` - Coerce to the primitive
//! - `email`, `url`, `ip`, `uuid` - Format checks
//! - `required` - Reject empty values
//! - `nullable` - Accept null and skip the chain
//! - `date` - Accept any date in the auto-detect layout list
//!
//! With a parameter:
//!
//! - `min:N`, `max:N`, `range:A,B` - Numeric bound, or length for text
//! - `format:LAYOUT` - Exact date layout
//! - `before:DATE,LAYOUT`, `after:DATE,LAYOUT` - Date comparison
//! - `in:a,b,c` - Strict membership
//! - `size:N` - Exact length
//! - `mime:a,b` - File type of a path
//!
//! ## Error Format
//!
//! [`ValidationError::to_api_error`] renders the standard envelope:
//!
//! ```json
//! {
//!   "error": {
//!     "type": "validation_error",
//!     "message": "Validation failed",
//!     "fields": [
//!       {"field": "age", "code": "min", "message": "Value must be at least 18", "params": {"min": 18}}
//!     ]
//!   }
//! }
//! ```

pub mod cast;
pub mod catalog;
pub mod config;
pub mod datetime;
mod engine;
mod error;
pub mod mime;
mod record;
pub mod sanitize;
pub mod spec;
mod validator;
pub mod value;

pub use catalog::{ComplexRuleCatalog, RuleCatalog, SimpleRuleCatalog};
pub use config::{ConfigError, EngineConfig, KeyStyle};
pub use datetime::{DateLayout, DateTimeResolver};
pub use engine::{FieldOutcome, ValidationEngine};
pub use error::{
    ApiValidationError, ErrorBody, FieldErrorResponse, FieldFailure, Result, RuleError,
    RuleErrorKind, ValidationError,
};
pub use mime::{FsMimeProbe, MimeProbe};
pub use record::{InputRecord, RuleTable, ValidatedRecord};
pub use spec::{RuleDescriptor, RuleSpec, RuleSpecError};
pub use validator::SmartValidator;

/// Prelude module for validation
pub mod prelude {
    pub use crate::catalog::{ComplexRuleCatalog, RuleCatalog, SimpleRuleCatalog};
    pub use crate::config::{EngineConfig, KeyStyle};
    pub use crate::engine::ValidationEngine;
    pub use crate::error::{FieldFailure, RuleError, ValidationError};
    pub use crate::record::{InputRecord, RuleTable, ValidatedRecord};
    pub use crate::spec::RuleDescriptor;
    pub use crate::validator::SmartValidator;
    pub use serde_json::json;
}
