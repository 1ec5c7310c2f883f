pub mod estimate;
pub mod order;
