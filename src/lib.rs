pub mod cli;
pub mod compiler;
pub mod marker;
pub mod parser;
pub mod report;
pub mod table;
pub mod targets;
