#![deny(missing_docs)]

//! # Handlers
//!
//! Channel/operation classification and the consolidation passes that turn the
//! raw handler list into the published one.

pub mod bindings;
pub mod classify;
pub mod consolidate;
pub mod grouping;
pub mod models;
pub mod naming;
pub mod params;

pub use classify::Classifier;
pub use consolidate::consolidate;
pub use grouping::group_by_custom_name;
pub use naming::ensure_unique_names;
pub use models::{
    Action, ChannelParameter, Endpoint, Handler, HandlerKind, MethodArg, Payload, QueueInfo,
    SendMethod,
};

use crate::options::{Binder, View};
use crate::schemas::ResolverContext;

/// Classifies, consolidates and groups the handlers of one contract, then makes
/// their names unique.
///
/// Consolidation only runs once every channel has been classified, since a merge
/// may involve handlers from channels far apart.
pub fn resolve_handlers(ctx: &ResolverContext<'_>, view: View, binder: Binder) -> Vec<Handler> {
    let raw = Classifier::new(ctx, view, binder).classify();
    let consolidated = consolidate(raw);
    let mut handlers = group_by_custom_name(consolidated);
    ensure_unique_names(&mut handlers);
    handlers
}
