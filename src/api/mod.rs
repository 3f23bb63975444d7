pub mod employee;
pub mod vacation;
