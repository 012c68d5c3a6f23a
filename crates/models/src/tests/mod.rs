/// Student table operations against an in-memory SQLite database
pub mod crud_tests;
