//! Service layer for student records.
//! - Validates requests before anything reaches storage.
//! - Talks to persistence only through `StudentRepository`.
//! - Turns the store's unique-constraint signal into a conflict error.

pub mod errors;
pub mod student;
#[cfg(test)]
pub mod test_support;

pub use student::StudentService;
