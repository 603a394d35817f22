pub mod critical_condition;
pub mod postpartum;
pub mod pregnancy;
