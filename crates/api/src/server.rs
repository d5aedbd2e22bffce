//! Types dealing with discoverable proxy server metadata.
//!
//! [DiscoveryServer] describes one proxy endpoint together with the
//! half-open time window during which it may be handed out to clients.
//! Records are loaded by an external catalog and supplied to the
//! discovery module in bulk on every change; burrow only ever reads them.
//!
//! The canonical encoding for this record is JSON.
//!
//! ```json
//! {
//!   "title": "DiscoveryServer",
//!   "type": "object",
//!   "properties": {
//!     "server": { "type": "string", "required": true, "description": "base64" },
//!     "entry": { "type": "string", "required": true, "description": "base64" },
//!     "discoveryWindow": {
//!       "type": "object",
//!       "required": true,
//!       "properties": {
//!         "start": {
//!             "type": "string",
//!             "required": true,
//!             "description": "i64 micros since unix epoch"
//!         },
//!         "end": {
//!             "type": "string",
//!             "required": true,
//!             "description": "i64 micros since unix epoch"
//!         }
//!       }
//!     }
//!   }
//! }
//! ```

use crate::*;

mod serde_string_timestamp {
    pub fn serialize<S>(
        t: &crate::Timestamp,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&t.as_micros().to_string())
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<crate::Timestamp, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: &'de str = serde::Deserialize::deserialize(deserializer)?;
        let i: i64 = s.parse().map_err(serde::de::Error::custom)?;
        Ok(crate::Timestamp::from_micros(i))
    }
}

/// A half-open time interval `[start, end)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryWindow {
    /// The first instant at which the window is open.
    #[serde(with = "serde_string_timestamp")]
    pub start: Timestamp,

    /// The first instant at which the window is closed again.
    #[serde(with = "serde_string_timestamp")]
    pub end: Timestamp,
}

impl DiscoveryWindow {
    /// `true` if `t` falls within this window.
    ///
    /// The window is half-open: `start` is contained, `end` is not.
    /// A malformed window with `start > end` contains no instant at all.
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && t < self.end
    }
}

/// DiscoveryServer stores the discovery metadata for one proxy endpoint.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryServer {
    /// The stable server identity.
    pub server: ServerId,

    /// The encoded server entry handed to clients that discover this
    /// server. Opaque to burrow.
    #[serde(with = "crate::serde_bytes_base64")]
    pub entry: bytes::Bytes,

    /// The window during which this server may be handed out.
    pub discovery_window: DiscoveryWindow,
}

impl DiscoveryServer {
    /// `true` if this server may be handed out at time `t`.
    pub fn discoverable_at(&self, t: Timestamp) -> bool {
        self.discovery_window.contains(t)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn happy_encode_decode() {
        let server = DiscoveryServer {
            server: bytes::Bytes::from_static(b"test-server").into(),
            entry: bytes::Bytes::from_static(b"entry-bytes"),
            discovery_window: DiscoveryWindow {
                start: Timestamp::from_micros(1731690797907204),
                end: Timestamp::from_micros(1731762797907204),
            },
        };

        let enc = serde_json::to_string(&server).unwrap();

        assert_eq!(
            r#"{"server":"dGVzdC1zZXJ2ZXI","entry":"ZW50cnktYnl0ZXM","discoveryWindow":{"start":"1731690797907204","end":"1731762797907204"}}"#,
            enc
        );

        let dec: DiscoveryServer = serde_json::from_str(&enc).unwrap();
        assert_eq!(server.server, dec.server);
        assert_eq!(server.entry, dec.entry);
        assert_eq!(server.discovery_window, dec.discovery_window);
    }

    #[test]
    fn window_is_half_open() {
        let w = DiscoveryWindow {
            start: Timestamp::from_micros(10),
            end: Timestamp::from_micros(20),
        };

        assert!(!w.contains(Timestamp::from_micros(9)));
        assert!(w.contains(Timestamp::from_micros(10)));
        assert!(w.contains(Timestamp::from_micros(19)));
        assert!(!w.contains(Timestamp::from_micros(20)));
        assert!(!w.contains(Timestamp::from_micros(100)));
    }

    #[test]
    fn empty_window_contains_nothing() {
        let w = DiscoveryWindow {
            start: Timestamp::from_micros(10),
            end: Timestamp::from_micros(10),
        };

        assert!(!w.contains(Timestamp::from_micros(10)));
    }

    #[test]
    fn inverted_window_contains_nothing() {
        let w = DiscoveryWindow {
            start: Timestamp::from_micros(20),
            end: Timestamp::from_micros(10),
        };

        for t in [0, 10, 15, 20, 30] {
            assert!(!w.contains(Timestamp::from_micros(t)));
        }
    }
}
