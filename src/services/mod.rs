pub mod approval;
pub mod corrections;
