//! The input AST (spec §3): three disjoint node families — `Statement`,
//! `Expression`, and the selector AST (kept under `crate::selector`
//! since the executor, not the parser, is what reparses it — see
//! `crate::selector`'s module doc). Produced by the parser and treated
//! as read-only for the lifetime of one compilation.

pub mod expr;
pub mod interpolation;
pub mod stmt;

pub use expr::Expression;
pub use interpolation::{Interpolation, InterpolationPart};
pub use stmt::Statement;
