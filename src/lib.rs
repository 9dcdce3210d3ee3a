pub mod app;
pub mod config;
pub mod deploy;

#[cfg(test)]
mod test_http;
