// src/types.rs
use serde::{Deserialize, Serialize};

/// Coin this deployment mines. Fixed for the lifetime of the process.
pub const MINING_COIN: &str = "DOGE";

/// Proof-of-work algorithm passed to the miner. Dogecoin uses scrypt.
pub const MINING_ALGORITHM: &str = "scrypt";

/// Pool password placeholder expected by cpuminer-compatible pools.
pub const POOL_PASSWORD: &str = "x";

/// Structured result returned to the web layer for start/stop operations
///
/// Every known error kind is converted into an `error` response at the
/// supervisor boundary; the web layer maps it to a flash message and never
/// sees an unhandled fault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    /// Either `"success"` or `"error"`
    pub status: String,
    /// Human-readable description of the outcome
    pub message: String,
}

impl ApiResponse {
    /// Builds a success response with the given message
    pub fn success(message: impl Into<String>) -> Self {
        ApiResponse {
            status: "success".into(),
            message: message.into(),
        }
    }

    /// Builds an error response with the given message
    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            status: "error".into(),
            message: message.into(),
        }
    }

    /// Converts an operation result into the wire shape, using `ok_message`
    /// for the success case and the error's display text otherwise
    pub fn from_result<E: std::fmt::Display>(
        result: Result<(), E>,
        ok_message: &str,
    ) -> Self {
        match result {
            Ok(()) => ApiResponse::success(ok_message),
            Err(e) => ApiResponse::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MinerError;

    #[test]
    fn success_and_error_shapes() {
        let ok = ApiResponse::success("Mining started successfully");
        assert_eq!(ok.status, "success");

        let err = ApiResponse::error("boom");
        assert_eq!(err.status, "error");
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn from_result_maps_error_display() {
        let res: Result<(), MinerError> = Err(MinerError::NotRunningError);
        let resp = ApiResponse::from_result(res, "unused");
        assert_eq!(resp.status, "error");
        assert_eq!(resp.message, "Mining is not running");
    }
}
