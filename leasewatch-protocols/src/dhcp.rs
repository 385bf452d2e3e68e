//! ## leasewatch-protocols::dhcp
//! A fixed-offset DHCP frame parser: walks one captured Ethernet frame down
//! to the BOOTP option area and pulls out the message type together with the
//! lease-assignment (`yiaddr`) field.

use std::net::Ipv4Addr;

use thiserror::Error;

/// Ethernet II header size.
pub const ETHERNET_HEADER_LEN: usize = 14;
/// UDP header size.
pub const UDP_HEADER_LEN: usize = 8;
/// Smallest legal IPv4 header (IHL of 5 words).
const MIN_IPV4_HEADER_LEN: usize = 20;

/// Offset of the `yiaddr` field inside the fixed BOOTP header.
const BOOTP_YIADDR_OFFSET: usize = 16;
/// Offset of the option area: 236-byte fixed header plus 4-byte magic cookie.
const BOOTP_OPTIONS_OFFSET: usize = 240;

const OPTION_PAD: u8 = 0;
const OPTION_MESSAGE_TYPE: u8 = 53;
const OPTION_END: u8 = 255;

const MESSAGE_TYPE_ACK: u8 = 5;
const MESSAGE_TYPE_RELEASE: u8 = 7;

/// Errors that can occur while parsing a captured DHCP frame.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DhcpParseError {
    #[error("captured frame too short: got {got} bytes, need {need} to reach the option area")]
    TruncatedFrame { need: usize, got: usize },
}

/// DHCP message classification carried in option 53.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Ack,
    Release,
    Other(u8),
}

impl From<u8> for MessageKind {
    fn from(value: u8) -> Self {
        match value {
            MESSAGE_TYPE_ACK => MessageKind::Ack,
            MESSAGE_TYPE_RELEASE => MessageKind::Release,
            other => MessageKind::Other(other),
        }
    }
}

/// One lease-assignment event extracted from a frame. Ephemeral: produced per
/// frame and consumed immediately by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DhcpEvent {
    pub kind: MessageKind,
    /// The `yiaddr` field: the address the server assigned (or the client is
    /// relinquishing).
    pub client_address: Ipv4Addr,
}

/// Stateless DHCP frame parser.
#[derive(Default, Debug, Copy, Clone)]
pub struct DhcpParser;

impl DhcpParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses one captured frame.
    ///
    /// Returns `Ok(None)` for frames that carry no actionable message-type
    /// option, `Err(TruncatedFrame)` when the captured length stops before
    /// the option area is reachable. The option-area offset depends on the
    /// IPv4 header length, which must itself be read from the frame first.
    pub fn parse(&self, frame: &[u8]) -> Result<Option<DhcpEvent>, DhcpParseError> {
        // The IHL nibble sits in the first byte after the link-layer header.
        if frame.len() <= ETHERNET_HEADER_LEN {
            return Err(DhcpParseError::TruncatedFrame {
                need: ETHERNET_HEADER_LEN + 1,
                got: frame.len(),
            });
        }
        let ip_header_len = ((frame[ETHERNET_HEADER_LEN] & 0x0f) as usize) * 4;
        if ip_header_len < MIN_IPV4_HEADER_LEN {
            // Malformed network header, not a truncation.
            return Ok(None);
        }

        let payload = ETHERNET_HEADER_LEN + ip_header_len + UDP_HEADER_LEN;
        let options_start = payload + BOOTP_OPTIONS_OFFSET;
        if frame.len() < options_start {
            return Err(DhcpParseError::TruncatedFrame {
                need: options_start,
                got: frame.len(),
            });
        }

        // Walk the (code, length, value) option triples until the message
        // type or the end-of-options marker shows up. Running out of bytes
        // means the frame carries nothing actionable.
        let mut cursor = options_start;
        while cursor < frame.len() {
            match frame[cursor] {
                OPTION_PAD => cursor += 1,
                OPTION_END => return Ok(None),
                OPTION_MESSAGE_TYPE => {
                    let Some(&value) = frame.get(cursor + 2) else {
                        return Ok(None);
                    };
                    // yiaddr lives in the fixed-format header, which is fully
                    // present once the option area is reachable.
                    let yiaddr = payload + BOOTP_YIADDR_OFFSET;
                    let client_address = Ipv4Addr::new(
                        frame[yiaddr],
                        frame[yiaddr + 1],
                        frame[yiaddr + 2],
                        frame[yiaddr + 3],
                    );
                    return Ok(Some(DhcpEvent {
                        kind: MessageKind::from(value),
                        client_address,
                    }));
                }
                _ => {
                    let Some(&length) = frame.get(cursor + 1) else {
                        return Ok(None);
                    };
                    cursor += 2 + length as usize;
                }
            }
        }
        Ok(None)
    }
}
