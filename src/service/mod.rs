//! Service layer
//!
//! Contains business logic separated from the embedding web layer.
//! Services orchestrate database and cache operations; callers are expected
//! to consult the authorization engine before invoking any mutation.

mod auth;
mod authz;
mod content;
mod feed;
mod relationship;

pub use auth::{AuthService, AuthenticationError};
pub use authz::AuthzService;
pub use content::ContentService;
pub use feed::{FeedItem, FeedService};
pub use relationship::RelationshipService;
