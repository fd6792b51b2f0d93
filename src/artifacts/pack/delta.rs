//! Ref-delta reconstruction
//!
//! A delta body is two little-endian base-128 sizes (base, result) followed by
//! instructions:
//!
//! ```text
//! 0xxxxxxx                  insert the next x bytes (x != 0)
//! 1sssoooo [offset] [size]  copy from the base; each set bit pulls in one
//!                           operand byte, lowest first
//! ```
//!
//! A copy whose size operand decodes to zero copies 0x10000 bytes.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::pack::graph::ObjectGraph;
use crate::errors::{BitError, BitResult};
use bytes::{BufMut, Bytes, BytesMut};

const COPY_ZERO_SIZE: usize = 0x10000;

/// A ref-delta entry waiting for its base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaRecord {
    pub base_oid: ObjectId,
    pub base_size: u64,
    pub result_size: u64,
    pub instructions: Bytes,
}

impl DeltaRecord {
    /// Split an inflated delta body into its size header and instructions
    pub fn parse(base_oid: ObjectId, delta: Bytes) -> BitResult<Self> {
        let mut cursor = 0;
        let base_size = read_size(base_oid, &delta, &mut cursor)?;
        let result_size = read_size(base_oid, &delta, &mut cursor)?;

        Ok(DeltaRecord {
            base_oid,
            base_size,
            result_size,
            instructions: delta.slice(cursor..),
        })
    }

    /// Rebuild the target object from the base's bytes
    pub fn apply(&self, base: &[u8]) -> BitResult<Bytes> {
        if base.len() as u64 != self.base_size {
            return Err(self.malformed(format!(
                "base is {} bytes but delta expects {}",
                base.len(),
                self.base_size
            )));
        }

        let result = apply_delta(self.base_oid, base, &self.instructions)?;
        if result.len() as u64 != self.result_size {
            return Err(self.malformed(format!(
                "produced {} bytes but delta declares {}",
                result.len(),
                self.result_size
            )));
        }

        Ok(result)
    }

    fn malformed(&self, reason: String) -> BitError {
        BitError::MalformedDelta {
            base: self.base_oid,
            reason,
        }
    }
}

fn read_size(base_oid: ObjectId, data: &[u8], cursor: &mut usize) -> BitResult<u64> {
    let mut size = 0u64;
    let mut shift = 0;

    loop {
        let byte = *data.get(*cursor).ok_or_else(|| BitError::MalformedDelta {
            base: base_oid,
            reason: "truncated size header".to_string(),
        })?;
        *cursor += 1;

        if shift > 63 {
            return Err(BitError::MalformedDelta {
                base: base_oid,
                reason: "size header overflows".to_string(),
            });
        }
        size |= u64::from(byte & 0x7f) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            return Ok(size);
        }
    }
}

/// Run a delta instruction stream against `base`
pub fn apply_delta(base_oid: ObjectId, base: &[u8], instructions: &[u8]) -> BitResult<Bytes> {
    let malformed = |reason: String| BitError::MalformedDelta {
        base: base_oid,
        reason,
    };

    let mut result = BytesMut::new();
    let mut cursor = 0;

    while cursor < instructions.len() {
        let opcode = instructions[cursor];
        cursor += 1;

        if opcode & 0x80 == 0 {
            let len = usize::from(opcode & 0x7f);
            if len == 0 {
                return Err(malformed(format!(
                    "reserved opcode 0x00 at instruction offset {}",
                    cursor - 1
                )));
            }
            let data = instructions
                .get(cursor..cursor + len)
                .ok_or_else(|| malformed(format!("insert of {len} bytes runs past the end")))?;
            result.put_slice(data);
            cursor += len;
            continue;
        }

        let mut operand = |bits: std::ops::Range<u8>| -> BitResult<usize> {
            let mut value = 0usize;
            for (index, bit) in bits.enumerate() {
                if opcode & (1 << bit) != 0 {
                    let byte = *instructions
                        .get(cursor)
                        .ok_or_else(|| malformed("truncated copy operand".to_string()))?;
                    cursor += 1;
                    value |= usize::from(byte) << (8 * index);
                }
            }
            Ok(value)
        };

        let offset = operand(0..4)?;
        let size = match operand(4..7)? {
            0 => COPY_ZERO_SIZE,
            size => size,
        };

        let data = offset
            .checked_add(size)
            .and_then(|end| base.get(offset..end))
            .ok_or_else(|| {
                malformed(format!(
                    "copy of {size} bytes at offset {offset} exceeds base of {} bytes",
                    base.len()
                ))
            })?;
        result.put_slice(data);
    }

    Ok(result.freeze())
}

/// Resolves every pending delta of a graph, optionally persisting the results
///
/// When a base is not in the graph the store is consulted, so packs that
/// reference objects already on disk still decode.
#[derive(Debug, Default)]
pub struct DeltaResolver<'s> {
    store: Option<&'s Database>,
}

impl<'s> DeltaResolver<'s> {
    pub fn new() -> Self {
        DeltaResolver { store: None }
    }

    pub fn with_store(store: &'s Database) -> Self {
        DeltaResolver { store: Some(store) }
    }

    /// Resolve pending records until none remain, returning how many resolved
    ///
    /// Each pass handles every record whose base is available; a pass that
    /// makes no progress fails, so the number of passes never exceeds the
    /// number of records.
    pub fn resolve(&self, graph: &mut ObjectGraph) -> BitResult<usize> {
        let mut resolved = 0;
        let mut pass = 0;

        loop {
            let pending = graph.take_pending();
            if pending.is_empty() {
                return Ok(resolved);
            }
            pass += 1;

            let total = pending.len();
            let mut unresolved = Vec::new();

            for record in pending {
                match self.base_of(graph, &record.base_oid)? {
                    Some((object_type, base)) => {
                        let result = record.apply(&base)?;
                        let object_id = graph.insert(object_type, result.clone())?;
                        if let Some(store) = self.store {
                            store.store_raw(object_type, &result)?;
                        }
                        tracing::trace!(base = %record.base_oid, %object_id, "delta resolved");
                        resolved += 1;
                    }
                    None => unresolved.push(record),
                }
            }

            tracing::debug!(
                pass,
                resolved = total - unresolved.len(),
                remaining = unresolved.len(),
                "delta pass"
            );

            if unresolved.len() == total {
                return Err(BitError::MissingDeltaBase {
                    base: unresolved[0].base_oid,
                    unresolved: total,
                });
            }

            for record in unresolved {
                graph.push_delta(record);
            }
        }
    }

    fn base_of(
        &self,
        graph: &ObjectGraph,
        base_oid: &ObjectId,
    ) -> BitResult<Option<(ObjectType, Bytes)>> {
        if let Some(body) = graph.body(base_oid) {
            return Ok(Some(body.clone()));
        }

        match self.store {
            Some(store) => match store.load(base_oid) {
                Ok(body) => Ok(Some(body)),
                Err(BitError::ObjectNotFound(_)) => Ok(None),
                Err(e) => Err(e),
            },
            None => Ok(None),
        }
    }
}
