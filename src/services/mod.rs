pub mod aggregation;
pub mod analytics;
pub mod budget;
pub mod sample_data;
pub mod savings;
