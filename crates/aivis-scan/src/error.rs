use thiserror::Error;

/// Hard failures the pipeline surfaces to its caller.
///
/// Deliberately small: provider failures, parse failures, and cost-sink
/// failures all degrade into partial or zeroed results instead of erroring.
/// Only configuration-level problems belong here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no providers registered; configure at least one platform")]
    NoProviders,
}
