pub mod coaching;
pub mod plan_parser;
pub mod progress;
pub mod set_logger;
pub mod structured_plan;
