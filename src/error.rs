/// Failure reported by a [`Store`](crate::storage::Store) call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StoreError {
	#[error("no storage is available in this context")]
	Unavailable,
	#[error("storage rejected the operation")]
	Disabled,
	#[error("{0}")]
	Js(String),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// The store probe failed, so nothing is restored or saved for this activation.
	#[error("localStorage not available: {0}")]
	StoreUnavailable(#[source] StoreError),
	#[error("stored preferences are not valid json: {0}")]
	MalformedRecord(#[source] serde_json::Error),
	#[error(transparent)]
	Serialization(#[from] serde_json::Error),
	#[error(transparent)]
	Store(#[from] StoreError),
	#[error("invalid options: {0}")]
	InvalidOptions(String),
}
