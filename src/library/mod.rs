pub mod logger;

#[cfg(test)]
pub mod stub_endpoint;
