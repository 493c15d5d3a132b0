use std::{
    net::{SocketAddr, UdpSocket},
    str::FromStr,
};

use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::panel::FrameOutput;

/// DMX channels used per universe, 170 whole RGB pixels.
const CHANNELS_PER_UNIVERSE: usize = 510;

/// Sends frames to an OLA daemon via its OSC plugin, spreading large panels
/// over consecutive universes.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    first_universe: u32,
}

impl OlaOutput {
    pub fn new(target_addr: SocketAddr, first_universe: u32) -> Result<Self, String> {
        let our_addr = SocketAddr::from_str("0.0.0.0:0").map_err(|err| err.to_string())?;
        let sock = match UdpSocket::bind(our_addr) {
            Ok(sock) => sock,
            Err(error) => return Err(error.to_string()),
        };

        log::info!("Sending frames to OLA at {target_addr}, starting at universe {first_universe}");
        Ok(OlaOutput {
            sock,
            target_addr,
            first_universe,
        })
    }
}

impl FrameOutput for OlaOutput {
    fn send(&mut self, frame: &[u8]) -> Result<(), String> {
        for packet in encode_frame(frame, self.first_universe)? {
            if let Err(err) = self.sock.send_to(&packet, self.target_addr) {
                return Err(err.to_string());
            }
        }
        Ok(())
    }
}

fn encode_frame(frame: &[u8], first_universe: u32) -> Result<Vec<Vec<u8>>, String> {
    let mut packets = vec![];
    for (i, channels) in frame.chunks(CHANNELS_PER_UNIVERSE).enumerate() {
        let packet = OscPacket::Message(OscMessage {
            addr: format!("/dmx/universe/{}", first_universe + i as u32),
            args: vec![OscType::Blob(channels.to_vec())],
        });
        match encoder::encode(&packet) {
            Ok(buf) => packets.push(buf),
            Err(err) => return Err(format!("{:?}", err)),
        }
    }
    Ok(packets)
}
