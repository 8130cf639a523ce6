//! Auth-domain identifiers, access tokens, and the normalized identity handed to hosts.

pub mod identity;
pub mod name;
pub mod token;

pub use identity::*;
pub use name::*;
pub use token::*;
