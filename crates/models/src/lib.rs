pub mod errors;
pub mod db;
pub mod user;
pub mod product;

#[cfg(test)]
mod tests;
