
/// CRUD operations against Postgres
pub mod crud_tests;
