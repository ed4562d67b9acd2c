//! Domain model (Middleware and the values it is built from).
//!
//! - `middleware`: the validated, immutable unit of work
//! - `dependencies` / `input` / `descriptor`: ways of supplying its fields
//! - `overrides`: field replacements for `Middleware::clone_with`
//! - `errors`: construction / write failures

pub mod dependencies;
pub mod descriptor;
pub mod errors;
pub mod input;
pub mod middleware;
pub mod overrides;

pub use self::dependencies::Dependencies;
pub use self::descriptor::MiddlewareDescriptor;
pub use self::errors::{Field, MiddlewareError};
pub use self::input::Input;
pub use self::middleware::{ARITY, Middleware};
pub use self::overrides::MiddlewareOverrides;
