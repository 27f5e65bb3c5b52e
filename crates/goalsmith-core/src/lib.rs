//! `goalsmith-core` — domain model and AI-response normalization pipeline.
//!
//! The crate is the deterministic half of goalsmith: everything here is
//! total. Provider text goes in (or doesn't), a complete [`record::SmartRecord`]
//! comes out, no matter how malformed the upstream answer was.
//!
//! ```text
//! GoalRequest
//!     │
//!     ▼
//! prompt::build_smart_prompt
//!     │
//!     ▼
//! TextGen (provider chain, implemented in `textgen-client`)
//!     │
//!     ▼
//! normalize::normalize_smart   ← fallback cascade, never fails
//!     │
//!     ▼
//! pipeline::Pipeline           ← bounded fan-out, order-preserving
//! ```

pub mod error;
pub mod generate;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod record;

pub use error::{GoalsmithError, Result};
pub use generate::TextGen;
pub use pipeline::Pipeline;
pub use record::{GoalRequest, IkigaiAnswers, IkigaiRecord, SmartFields, SmartRecord};
