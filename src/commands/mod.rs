pub mod check;
pub mod compare;
pub mod resolve;
pub mod segment;

pub use check::run_check;
pub use compare::run_compare_names;
pub use resolve::run_resolve_alias;
pub use segment::run_segment;
