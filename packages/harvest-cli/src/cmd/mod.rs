pub mod extract;
pub mod scrape;
pub mod summary;
