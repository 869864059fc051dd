use log::warn;

use slotsync_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

/// Packets are filled up to this size. A single message larger than this
/// still goes out, alone in its own packet.
pub const MTU_SIZE_BYTES: usize = 1200;
const MTU_SIZE_BITS: u32 = (MTU_SIZE_BYTES * 8) as u32;

/// Frames `messages` into as few packets as fit the MTU, preserving order.
/// Each message is preceded by a continuation bit; a zero bit ends the packet.
pub fn write_packets<M: Serde>(messages: &[M]) -> Vec<Vec<u8>> {
    let mut packets = Vec::new();
    let mut writer = BitWriter::new();
    let mut count = 0;

    for message in messages {
        let message_bits = message.bit_length() + 1;
        if count > 0 && writer.bits_written() + message_bits + 1 > MTU_SIZE_BITS {
            writer.write_bit(false);
            packets.push(std::mem::take(&mut writer).to_bytes());
            count = 0;
        }
        if message_bits + 1 > MTU_SIZE_BITS {
            warn!("message of {} bits exceeds the MTU, sending it alone", message_bits);
        }
        writer.write_bit(true);
        message.ser(&mut writer);
        count += 1;
    }

    if count > 0 {
        writer.write_bit(false);
        packets.push(writer.to_bytes());
    }
    packets
}

/// Reads every message of one packet, in order. A packet that fails to
/// decode is rejected whole.
pub fn read_packet<M: Serde>(bytes: &[u8]) -> Result<Vec<M>, SerdeErr> {
    let mut reader = BitReader::new(bytes);
    let mut messages = Vec::new();
    while reader.read_bit()? {
        messages.push(M::de(&mut reader)?);
    }
    Ok(messages)
}
