//! Student records: domain types, repository abstraction, and the service
//! that enforces the create/list/get/update rules.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use self::service::StudentService;
