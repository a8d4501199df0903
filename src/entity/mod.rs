//! SeaORM entity definitions.
//!
//! Status columns hold ids into the fixed lookup tables described in
//! [`crate::models::status`].

pub mod launch;
pub mod project;
pub mod test_history;
pub mod test_run;
pub mod test_suite;
pub mod test_suite_history;
