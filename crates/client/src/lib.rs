pub mod flow;
pub mod transport;

pub use flow::run;
pub use transport::{build_client, ReqwestTransport};
