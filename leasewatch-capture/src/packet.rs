/// A captured link-layer frame.
use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct Packet {
    pub data: Bytes,
}

impl Packet {
    pub fn new(data: Vec<u8>) -> Self {
        Packet {
            data: Bytes::from(data),
        }
    }
}
