pub mod duplicates;
pub mod evidence;
pub mod geo;
pub mod priority;
pub mod reputation;
pub mod similarity;
pub mod submission;
