//! Types the storefront keeps in the visitor's session.

pub mod notice;
pub mod session;

pub use notice::Notice;
pub use session::keys as session_keys;
