//! Non-blocking OSC receiver for the pose stream.
//!
//! Self-contained: no imports from other pose_overlay modules.

use std::io;
use std::net::UdpSocket;

use anyhow::Result;
use rosc::{OscMessage, OscPacket};

/// Largest payload a UDP datagram can carry.
const MAX_DATAGRAM: usize = 65507;

/// UDPソケットからOSCメッセージを取り出す受信機
pub struct OscReceiver {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl OscReceiver {
    /// 指定ポートで待ち受ける（ノンブロッキング）
    pub fn bind(port: u16) -> Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", port))?;
        socket.set_nonblocking(true)?;
        Ok(Self {
            socket,
            buf: vec![0u8; MAX_DATAGRAM],
        })
    }

    /// 溜まっているデータグラムをすべて読み出し、バンドルを展開して
    /// メッセージのリストにして返す。待っているものが無ければ空。
    /// デコードできないデータグラムは黙って捨てる
    pub fn drain(&mut self) -> Vec<OscMessage> {
        let mut messages = Vec::new();

        loop {
            match self.socket.recv(&mut self.buf) {
                Ok(len) => {
                    if let Ok((_, packet)) = rosc::decoder::decode_udp(&self.buf[..len]) {
                        flatten(packet, &mut messages);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(_) => break,
            }
        }

        messages
    }
}

/// パケットを再帰的に展開してメッセージだけを集める。
/// 送信側はフレームごとに1バンドル（/timestamp + 人物ごとの
/// /pose/data）を送ってくることがある
pub fn flatten(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(msg) => out.push(msg),
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                flatten(inner, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::{OscBundle, OscTime, OscType};

    fn msg(addr: &str) -> OscMessage {
        OscMessage {
            addr: addr.to_string(),
            args: vec![OscType::Float(1.0)],
        }
    }

    #[test]
    fn test_flatten_message() {
        let mut out = Vec::new();
        flatten(OscPacket::Message(msg("/pose/data")), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].addr, "/pose/data");
    }

    #[test]
    fn test_flatten_nested_bundle() {
        let inner = OscBundle {
            timetag: OscTime::from((0, 1)),
            content: vec![
                OscPacket::Message(msg("/pose/data")),
                OscPacket::Message(msg("/pose/data")),
            ],
        };
        let outer = OscBundle {
            timetag: OscTime::from((0, 1)),
            content: vec![
                OscPacket::Message(msg("/timestamp")),
                OscPacket::Bundle(inner),
            ],
        };

        let mut out = Vec::new();
        flatten(OscPacket::Bundle(outer), &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].addr, "/timestamp");
    }

    #[test]
    fn test_drain_roundtrip() {
        let mut receiver = OscReceiver::bind(0).unwrap();
        let port = receiver.socket.local_addr().unwrap().port();

        let sender = UdpSocket::bind("0.0.0.0:0").unwrap();
        let packet = OscPacket::Message(msg("/pose/data"));
        let data = rosc::encoder::encode(&packet).unwrap();
        sender.send_to(&data, ("127.0.0.1", port)).unwrap();

        // 到着を待つ（ノンブロッキングなのでリトライ）
        let mut messages = Vec::new();
        for _ in 0..50 {
            messages = receiver.drain();
            if !messages.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].addr, "/pose/data");
    }

    #[test]
    fn test_drain_empty() {
        let mut receiver = OscReceiver::bind(0).unwrap();
        assert!(receiver.drain().is_empty());
    }

    #[test]
    fn test_drain_drops_garbage() {
        let mut receiver = OscReceiver::bind(0).unwrap();
        let port = receiver.socket.local_addr().unwrap().port();

        let sender = UdpSocket::bind("0.0.0.0:0").unwrap();
        sender.send_to(b"not osc", ("127.0.0.1", port)).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(50));
        assert!(receiver.drain().is_empty());
    }
}
