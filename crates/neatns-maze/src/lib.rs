use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

/// Encoded size of one [`AgentRecord`].
pub const RECORD_WIDTH: usize = 41;

/// One agent's final state after a maze simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgentRecord {
    pub agent_id: i32,
    pub x: i32,
    pub y: i32,
    pub fitness: f64,
    pub got_exit: bool,
    pub generation: i32,
    pub novelty: f64,
    pub species_id: i32,
    pub species_age: i32,
}

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("truncated record: {len} trailing bytes, expected {}", RECORD_WIDTH)]
    Truncated { len: usize },
    #[error("invalid exit flag byte: {value}")]
    InvalidFlag { value: u8 },
}

/// Ordered collection of agent records with a fixed-width little-endian
/// encoding and no header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    pub records: Vec<AgentRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AgentRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.records.len() * RECORD_WIDTH);
        for record in &self.records {
            encode_record(record, &mut buf);
        }
        buf
    }

    pub fn from_bytes(mut buf: impl Buf) -> Result<Self, RecordStoreError> {
        let mut records = Vec::with_capacity(buf.remaining() / RECORD_WIDTH);
        while buf.has_remaining() {
            if buf.remaining() < RECORD_WIDTH {
                return Err(RecordStoreError::Truncated {
                    len: buf.remaining(),
                });
            }
            records.push(decode_record(&mut buf)?);
        }
        Ok(Self { records })
    }

    pub fn write(&self, mut sink: impl Write) -> Result<(), RecordStoreError> {
        sink.write_all(&self.to_bytes())?;
        sink.flush()?;
        Ok(())
    }

    pub fn read(mut source: impl Read) -> Result<Self, RecordStoreError> {
        let mut raw = Vec::new();
        source.read_to_end(&mut raw)?;
        Self::from_bytes(raw.as_slice())
    }
}

fn encode_record(record: &AgentRecord, buf: &mut impl BufMut) {
    buf.put_i32_le(record.agent_id);
    buf.put_i32_le(record.x);
    buf.put_i32_le(record.y);
    buf.put_f64_le(record.fitness);
    buf.put_u8(u8::from(record.got_exit));
    buf.put_i32_le(record.generation);
    buf.put_f64_le(record.novelty);
    buf.put_i32_le(record.species_id);
    buf.put_i32_le(record.species_age);
}

// Caller guarantees at least RECORD_WIDTH bytes remain.
fn decode_record(buf: &mut impl Buf) -> Result<AgentRecord, RecordStoreError> {
    let agent_id = buf.get_i32_le();
    let x = buf.get_i32_le();
    let y = buf.get_i32_le();
    let fitness = buf.get_f64_le();
    let got_exit = match buf.get_u8() {
        0 => false,
        1 => true,
        value => return Err(RecordStoreError::InvalidFlag { value }),
    };
    Ok(AgentRecord {
        agent_id,
        x,
        y,
        fitness,
        got_exit,
        generation: buf.get_i32_le(),
        novelty: buf.get_f64_le(),
        species_id: buf.get_i32_le(),
        species_age: buf.get_i32_le(),
    })
}
