pub mod fingerprint;
pub mod http;
pub mod links;
pub mod retry;
pub mod rng;
