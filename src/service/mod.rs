pub mod clock;
pub mod vacation;
