//! URL handling module for bookmark-icons
//!
//! This module reduces user-supplied URLs to the keys the resolver works with:
//! - the origin (`scheme://host[:port]`), which keys the icon cache
//! - the bare domain (lower-cased host without `www.`), which keys the
//!   known-service table

mod domain;
mod normalize;

pub use domain::bare_domain;
pub use normalize::{ensure_scheme, normalize_origin, origin_of};
