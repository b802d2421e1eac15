pub mod client;
pub mod controller;
#[cfg(test)]
pub(crate) mod fakes;
pub mod request;

pub use controller::JobController;
pub use request::TranscriptionRequest;
