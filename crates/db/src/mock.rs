//! mockall doubles of the repositories, for handler tests that should not
//! need a running database.

pub mod repositories;
