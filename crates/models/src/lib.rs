pub mod errors;
pub mod db;
pub mod api_key;

#[cfg(test)]
mod tests;
