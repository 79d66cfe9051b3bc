pub mod onboard;
pub mod talk;
pub mod tools;
