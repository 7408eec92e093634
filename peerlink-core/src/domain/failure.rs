use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why a discovery request produced no peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryFailure {
    /// The accessory device is not connected to this host
    DeviceNotConnected,
    /// The device is connected but no peer offers the service
    ServiceNotFound,
}

impl DiscoveryFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryFailure::DeviceNotConnected => "FINDPEER_DEVICE_NOT_CONNECTED",
            DiscoveryFailure::ServiceNotFound => "FINDPEER_SERVICE_NOT_FOUND",
        }
    }
}

impl fmt::Display for DiscoveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error code attached to an asynchronous send failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendErrorCode {
    PeerUnreachable,
    PeerNoResponse,
    /// The peer agent does not support messaging
    PeerNotSupported,
    /// The peer does not offer the requested service
    PeerServiceNotSupported,
    /// The local side does not offer the requested service
    ServiceNotSupported,
    Unknown,
}

impl SendErrorCode {
    pub const ALL: [SendErrorCode; 6] = [
        SendErrorCode::PeerUnreachable,
        SendErrorCode::PeerNoResponse,
        SendErrorCode::PeerNotSupported,
        SendErrorCode::PeerServiceNotSupported,
        SendErrorCode::ServiceNotSupported,
        SendErrorCode::Unknown,
    ];

    /// Vendor label, as printed in NAK lines
    pub fn as_str(&self) -> &'static str {
        match self {
            SendErrorCode::PeerUnreachable => "PEER_AGENT_UNREACHABLE",
            SendErrorCode::PeerNoResponse => "PEER_AGENT_NO_RESPONSE",
            SendErrorCode::PeerNotSupported => "ERROR_PEER_AGENT_NOT_SUPPORTED",
            SendErrorCode::PeerServiceNotSupported => "ERROR_PEER_SERVICE_NOT_SUPPORTED",
            SendErrorCode::ServiceNotSupported => "ERROR_SERVICE_NOT_SUPPORTED",
            SendErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// Kebab-case form of the serde name
    fn name(&self) -> &'static str {
        match self {
            SendErrorCode::PeerUnreachable => "peer-unreachable",
            SendErrorCode::PeerNoResponse => "peer-no-response",
            SendErrorCode::PeerNotSupported => "peer-not-supported",
            SendErrorCode::PeerServiceNotSupported => "peer-service-not-supported",
            SendErrorCode::ServiceNotSupported => "service-not-supported",
            SendErrorCode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized code: {0}")]
pub struct ParseCodeError(String);

/// Lower-case, dashes for underscores, optional `error-` prefix dropped
fn normalize(s: &str) -> String {
    let lowered = s.trim().to_ascii_lowercase().replace('_', "-");
    match lowered.strip_prefix("error-") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

/// Accepts the vendor label (`PEER_AGENT_NO_RESPONSE`, `ERROR_SERVICE_NOT_SUPPORTED`)
/// or the serde name, in any case, with dashes or underscores.
impl FromStr for SendErrorCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        SendErrorCode::ALL
            .into_iter()
            .find(|code| normalize(code.as_str()) == normalized || code.name() == normalized)
            .ok_or_else(|| ParseCodeError(s.to_string()))
    }
}

impl FromStr for DiscoveryFailure {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "device-not-connected" | "findpeer-device-not-connected" => {
                Ok(DiscoveryFailure::DeviceNotConnected)
            }
            "service-not-found" | "findpeer-service-not-found" => {
                Ok(DiscoveryFailure::ServiceNotFound)
            }
            _ => Err(ParseCodeError(s.to_string())),
        }
    }
}
