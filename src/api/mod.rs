//! One module per backend resource. Each is a set of stateless typed
//! request functions over a shared [`ApiClient`](crate::http::ApiClient).

pub mod contracts;
pub mod deploy;
pub mod network;
pub mod rpc;
pub mod scaffold;
