/// Classification for retry policy.
///
/// Used by the adapter to decide whether a failed attempt is repeated on the
/// same endpoint or handed over to the next one.
///
/// # Behavior Summary
///
/// | Class | Retry same endpoint? | Try secondary endpoint? |
/// |-------|----------------------|-------------------------|
/// | `WithBackoff` | Yes, until the attempt budget is spent | Yes, once exhausted |
/// | `NextEndpoint` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient failure: timeout, connection error, 429 or a 5xx-style status.
    ///
    /// The attempt is repeated after an exponentially growing delay. Once the
    /// budget is spent the adapter moves on to the secondary endpoint.
    WithBackoff,

    /// Repeating the same request cannot help (bad credentials, a payload that
    /// is not JSON, a URL template the lookup key cannot fill).
    ///
    /// The secondary endpoint may still succeed, since it carries its own
    /// credentials and template.
    NextEndpoint,
}
