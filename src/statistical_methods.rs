pub mod photometry;
pub mod statistics;
