/// Signed-request kernel - the transport substrate every endpoint shares
///
/// The kernel is venue-plumbing only: it knows how to assemble and encode a
/// parameter string, authenticate it, pick a live base host, perform the HTTP
/// exchange, and convert the raw body into the representation the caller
/// asked for. It contains no per-endpoint knowledge; the facades under
/// `exchanges::binance` supply paths, parameters, and typed mappings.
///
/// # Architecture
///
/// One request flows through five stages:
///
/// 1. [`Params`] - insertion-ordered parameter assembly and percent-encoding
/// 2. [`RequestSigner`] - HMAC-SHA256 authentication (`Signed` endpoints)
/// 3. [`resolve_host`] - base host selection with maintenance detection
/// 4. [`RestClient`] - the HTTP exchange, returning the raw body on any status
/// 5. [`materialize`] - raw text / generic JSON / typed object conversion,
///    with [`classify`] normalizing every failure into one classified error
///
/// # Key Principles
///
/// 1. **Transport Only**: no endpoint-specific logic lives here
/// 2. **Pluggable**: signer, probe, and transport are trait seams
/// 3. **Call-local state**: nothing from one request is stored for the next;
///    the only shared state is immutable after construction
/// 4. **Observable**: tracing on the request path
/// 5. **Testable**: dependency injection for every network touchpoint
pub mod params;
pub mod resolver;
pub mod response;
pub mod rest;
pub mod signer;

// Re-export key types for convenience
pub use params::Params;
pub use resolver::{
    resolve_host, ConnectivityProbe, RestProbe, BASE_HOST_CANDIDATES, TESTNET_HOST,
};
pub use response::{classify, from_json, materialize, JsonReader, Materialized, RawResponse, ReturnFormat};
pub use rest::{
    Endpoint, HttpMethod, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig,
    SecurityType,
};
pub use signer::{HmacSigner, RequestSigner};
