pub mod appointment;
pub mod employee;
