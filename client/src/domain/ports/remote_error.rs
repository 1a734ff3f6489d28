//! Failure shape shared by the REST-backed ports.

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the library REST API.
    ///
    /// Server-reported failures keep only the status code; views show the
    /// generic message rather than the response body.
    pub enum RemoteError {
        /// The request never produced a response.
        Transport { message: String } =>
            "network error: {message}",
        /// The server answered with a non-success status.
        Status { status: u16 } =>
            "request failed with status code {status}",
        /// The response body did not match the expected shape.
        Decode { message: String } =>
            "response could not be decoded: {message}",
    }
}
