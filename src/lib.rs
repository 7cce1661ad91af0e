pub mod app;
pub mod client;
pub mod clock;
pub mod conf;
pub mod error;
pub mod export;
pub mod records;
pub mod trigger;

#[cfg(test)]
mod testing;
