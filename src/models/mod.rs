pub mod feedback;
pub mod lenient;
pub mod log;
pub mod plan;
pub mod profile;
