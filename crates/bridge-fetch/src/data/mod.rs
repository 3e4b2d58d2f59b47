mod options;
mod response;

pub use options::FetchOptions;
pub use response::Response;
