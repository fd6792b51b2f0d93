//! Object arena produced by one pack decode
//!
//! Every key is the recomputed hash of its value; nothing in here is keyed by
//! an id taken from the wire.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::pack::delta::DeltaRecord;
use crate::errors::BitResult;
use bytes::Bytes;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ObjectGraph {
    commits: HashMap<ObjectId, Commit>,
    trees: HashMap<ObjectId, Tree>,
    blobs: HashMap<ObjectId, Blob>,
    bodies: HashMap<ObjectId, (ObjectType, Bytes)>,
    pending: Vec<DeltaRecord>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash, parse and index an object body
    ///
    /// Inserting an object that is already present only returns its id.
    pub fn insert(&mut self, object_type: ObjectType, body: Bytes) -> BitResult<ObjectId> {
        let object_id = object::hash(object_type, &body);
        if self.bodies.contains_key(&object_id) {
            return Ok(object_id);
        }

        match object_type {
            ObjectType::Commit => {
                self.commits
                    .insert(object_id, Commit::deserialize(body.clone())?);
            }
            ObjectType::Tree => {
                self.trees.insert(object_id, Tree::deserialize(body.clone())?);
            }
            ObjectType::Blob => {
                self.blobs.insert(object_id, Blob::new(body.clone()));
            }
        }
        self.bodies.insert(object_id, (object_type, body));

        Ok(object_id)
    }

    pub fn commit(&self, object_id: &ObjectId) -> Option<&Commit> {
        self.commits.get(object_id)
    }

    pub fn tree(&self, object_id: &ObjectId) -> Option<&Tree> {
        self.trees.get(object_id)
    }

    pub fn blob(&self, object_id: &ObjectId) -> Option<&Blob> {
        self.blobs.get(object_id)
    }

    /// Exact bytes and kind of any indexed object
    pub fn body(&self, object_id: &ObjectId) -> Option<&(ObjectType, Bytes)> {
        self.bodies.get(object_id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    pub fn push_delta(&mut self, record: DeltaRecord) {
        self.pending.push(record);
    }

    pub fn pending_deltas(&self) -> &[DeltaRecord] {
        &self.pending
    }

    pub fn take_pending(&mut self) -> Vec<DeltaRecord> {
        std::mem::take(&mut self.pending)
    }
}
