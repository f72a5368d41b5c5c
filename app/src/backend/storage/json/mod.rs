//! Device-local JSON storage for marks and payroll settings.

pub mod connection;
pub mod marks_repository;
pub mod payroll_config_repository;

pub use connection::JsonConnection;
pub use marks_repository::MarksRepository;
pub use payroll_config_repository::PayrollConfigRepository;
