//! Domain models and types for the mediator.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`MediatorUrn`], [`SystemId`])
//! - **Mediator identity** ([`MediatorIdentity`]) registered with OpenHIM
//! - **Operator configuration** ([`MediatorConfig`]) pushed by OpenHIM
//! - **Facility records** ([`FacilityRecord`]) served to callers
//! - **Error types** ([`MediatorError`], [`SwitchError`], [`UpstreamError`], [`TransformError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, MediatorError>`]:
//!
//! ```rust
//! use dhis_mediator::domain::{MediatorIdentity, Result};
//!
//! fn example() -> Result<()> {
//!     let identity = MediatorIdentity::bundled()?;
//!     println!("{}", identity.urn());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod facility;
pub mod identity;
pub mod ids;
pub mod mediator_config;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{MediatorError, SwitchError, TransformError, UpstreamError};
pub use facility::FacilityRecord;
pub use identity::MediatorIdentity;
pub use ids::{MediatorUrn, SystemId};
pub use mediator_config::{DhisSettings, MediatorConfig, UpstreamEndpoint};
pub use result::Result;
