// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # MemoryDB Resource Provider
//!
//! CRUDL resource handlers for AWS MemoryDB sub-resources: users, ACLs,
//! clusters and subnet groups.
//!
//! ## Overview
//!
//! The provider reconciles declared resource models against the live
//! service:
//!
//! - Create, read, update, delete and list each sub-resource type
//! - Merge stack-level and resource-level tags and apply the minimal
//!   add/remove delta
//! - Stabilize after every mutation without blocking: each invocation
//!   spends at most one status poll and records where to resume in a
//!   serialized callback context
//!
//! ## Architecture
//!
//! Operations that span service transitions run as **staged pipelines**:
//!
//! 1. Issue one remote mutation or one status poll
//! 2. Emit an in-progress event carrying the callback context
//! 3. Resume at the recorded stage on the next invocation
//!
//! ## Modules
//!
//! - [`tags`]: Tag merging and delta computation
//! - [`resource`]: Per-resource-type providers behind one trait
//! - [`api`]: MemoryDB API client seam
//! - [`stabilize`]: Single-poll stabilization
//! - [`handler`]: CRUDL handlers and progress events
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```json
//! {
//!   "clientRequestToken": "0a1b2c3d",
//!   "desiredResourceState": {
//!     "UserName": "app-reader",
//!     "AccessString": "on ~app:* +@read"
//!   },
//!   "desiredResourceTags": { "env": "prod" }
//! }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod api;
pub mod cli;
pub mod error;
pub mod handler;
pub mod resource;
pub mod stabilize;
pub mod tags;

// ============================================================================
// Re-exports
// ============================================================================

pub use api::{MemoryDb, SdkMemoryDb};
pub use cli::{Cli, Commands, OutputFormatter};
pub use error::{HandlerErrorCode, ProviderError, Result};
pub use handler::{
    Action, CallbackContext, OperationStatus, ProgressEvent, ResourceHandlerRequest, ResourceKind,
    dispatch,
};
pub use resource::{
    AclModel, AclResource, ClusterModel, ClusterResource, Resource, SubnetGroupModel,
    SubnetGroupResource, UserModel, UserResource,
};
pub use stabilize::{PollOutcome, ResourceHandle, StabilizeMode, poll_once};
pub use tags::{Tag, TagDelta, TagMap};
