//! Path-addressed edits over an owned binary document
//!
//! A [`Transformer`] owns one contiguous buffer holding a single encoded
//! value. Every edit is two phases:
//!
//! 1. A read-only descent along the path that records a stub per level:
//!    the tag of the value there, the span to remove when deleting it
//!    (key and value inside an object), and the span of the value proper.
//! 2. A backward rebuild: copy the suffix past the cut, lay the
//!    replacement segments in front of it, then walk the recorded stubs
//!    innermost-first and re-emit each ancestor's tag and length varint
//!    with the accumulated size delta folded in. The varints themselves
//!    change width as they are rewritten, so the delta cascades outward.
//!
//! The rebuilt buffer replaces the owned one only after the whole pass
//! succeeds; any failure leaves the document untouched.

use jsplice_codec::scalar::string_to_binary;
use jsplice_format::constants::{DOUBLE_SIZE, EMPTY_OBJECT, TAG_ARRAY, TAG_OBJECT, TAG_STRING};
use jsplice_format::varint::{decode_varint, encode_varint, varint_length};
use jsplice_format::{Result, SpliceError, ValueTag};

use crate::path::{Component, Path};

/// One level of a located path chain.
///
/// `del_start..del_limit` is the span removed when unsetting the value at
/// this level, including its container-level framing (the key, for an
/// object member). `set_start..set_limit` is the value span proper. The
/// two coincide for array elements and for the root.
#[derive(Debug, Clone, Copy)]
struct Stub {
    tag: u8,
    del_start: usize,
    del_limit: usize,
    set_start: usize,
    set_limit: usize,
}

/// Owning handle over a mutable binary document
#[derive(Debug)]
pub struct Transformer {
    binary: Vec<u8>,
}

impl Transformer {
    /// Copy `binary` in as the document to edit.
    ///
    /// The snapshot is not validated; operations on a malformed document
    /// fail when the descent trips over it.
    pub fn new(binary: &[u8]) -> Self {
        Transformer {
            binary: binary.to_vec(),
        }
    }

    /// A fresh copy of the current document
    pub fn output(&self) -> Vec<u8> {
        self.binary.clone()
    }

    /// Remove the value addressed by `path`.
    ///
    /// Unsetting the root (the empty path) resets the document to the
    /// empty object.
    pub fn unset_value(&mut self, path: &str) -> Result<()> {
        let path = Path::parse(path)?;
        let stubs = self.walk(&path)?;

        if stubs.len() != path.depth() + 1 {
            return Err(SpliceError::PathNotFound);
        }

        let target = stubs[stubs.len() - 1];
        let rebuilt = self.rebuild(&stubs, target.del_start, target.del_limit, &[])?;
        self.commit(rebuilt);
        Ok(())
    }

    /// Overwrite or create the value addressed by `path` with the encoded
    /// value `value`.
    ///
    /// At depth zero the whole document is replaced with `value` as given,
    /// without validating it; the caller is responsible for handing over a
    /// well-formed value. A missing final field is appended to its parent
    /// object; missing intermediate objects are created on the way, as
    /// long as the first component of the path already resolves. Setting a
    /// missing array index fails; arrays only grow through
    /// [`array_prepend_value`](Self::array_prepend_value) and
    /// [`array_append_value`](Self::array_append_value).
    pub fn set_value(&mut self, path: &str, value: &[u8]) -> Result<()> {
        let path = Path::parse(path)?;
        self.set_parsed(&path, value)
    }

    fn set_parsed(&mut self, path: &Path, value: &[u8]) -> Result<()> {
        let stubs = self.walk(path)?;

        if path.depth() == 0 {
            // Replace the whole document
            let rebuilt = self.rebuild(&stubs, 0, self.binary.len(), &[value])?;
            self.commit(rebuilt);
            return Ok(());
        }

        if stubs.len() == path.depth() + 1 {
            // Overwrite the existing value in place
            let target = stubs[stubs.len() - 1];
            let rebuilt = self.rebuild(&stubs, target.set_start, target.set_limit, &[value])?;
            self.commit(rebuilt);
            return Ok(());
        }

        if stubs.len() == path.depth() {
            // The parent exists; append a new (key, value) pair to it
            let parent = stubs[stubs.len() - 1];
            let name = match (parent.tag, path.component(path.depth() - 1)) {
                (TAG_OBJECT, Component::Field(name)) => name,
                _ => return Err(SpliceError::TypeMismatch),
            };

            let key = string_to_binary(name.as_bytes());
            let rebuilt =
                self.rebuild(&stubs, parent.del_limit, parent.del_limit, &[key.as_slice(), value])?;
            self.commit(rebuilt);
            return Ok(());
        }

        if stubs.len() >= 2 && stubs.len() < path.depth() {
            // Create the missing intermediate objects, then try again. The
            // created parents must not survive a failure of the final
            // insertion, so the whole two-step is rolled back on error.
            let snapshot = self.binary.clone();
            let result = self
                .set_parsed(&path.parent(), &EMPTY_OBJECT)
                .and_then(|_| self.set_parsed(path, value));

            if result.is_err() {
                self.binary = snapshot;
            }

            return result;
        }

        Err(SpliceError::PathNotFound)
    }

    /// Copy out the value addressed by `path` as a standalone document
    pub fn extract_value(&self, path: &str) -> Result<Vec<u8>> {
        let path = Path::parse(path)?;
        let stubs = self.walk(&path)?;

        if stubs.len() != path.depth() + 1 {
            return Err(SpliceError::PathNotFound);
        }

        let target = stubs[stubs.len() - 1];
        Ok(self.binary[target.set_start..target.set_limit].to_vec())
    }

    /// Insert `value` at the front of the array addressed by `path`
    pub fn array_prepend_value(&mut self, path: &str, value: &[u8]) -> Result<()> {
        self.array_splice(path, value, true)
    }

    /// Insert `value` at the back of the array addressed by `path`
    pub fn array_append_value(&mut self, path: &str, value: &[u8]) -> Result<()> {
        self.array_splice(path, value, false)
    }

    fn array_splice(&mut self, path: &str, value: &[u8], front: bool) -> Result<()> {
        let path = Path::parse(path)?;
        let stubs = self.walk(&path)?;

        if stubs.len() != path.depth() + 1 {
            return Err(SpliceError::PathNotFound);
        }

        let target = stubs[stubs.len() - 1];

        if target.tag != TAG_ARRAY {
            return Err(SpliceError::NotAnArray);
        }

        let (body, used) = decode_varint(&self.binary[target.set_start + 1..target.set_limit])?;
        let body_start = target.set_start + 1 + used;

        if body_start.checked_add(body as usize) != Some(target.set_limit) {
            return Err(SpliceError::BodyOverrun);
        }

        // Re-synthesize the array header over the grown body
        let mut header = Vec::with_capacity(1 + varint_length(body + value.len() as u64));
        header.push(TAG_ARRAY);
        header.extend_from_slice(&encode_varint(body + value.len() as u64));

        let old_body = self.binary[body_start..target.set_limit].to_vec();
        let segments: [&[u8]; 3] = if front {
            [&header, value, &old_body]
        } else {
            [&header, &old_body, value]
        };

        let rebuilt = self.rebuild(&stubs, target.set_start, target.set_limit, &segments)?;
        self.commit(rebuilt);
        Ok(())
    }

    /// Descend along `path`, recording a stub per level reached.
    ///
    /// The returned chain holds `path.depth() + 1` stubs when the target
    /// exists, fewer when the descent stopped at a missing object member.
    /// Structural damage and component/container mismatches are errors.
    fn walk(&self, path: &Path) -> Result<Vec<Stub>> {
        let mut stubs = Vec::with_capacity(path.depth() + 1);
        self.walk_value(path, &mut stubs, 0, self.binary.len(), 0, self.binary.len(), 0)?;
        Ok(stubs)
    }

    #[allow(clippy::too_many_arguments)]
    fn walk_value(
        &self,
        path: &Path,
        stubs: &mut Vec<Stub>,
        del_start: usize,
        del_limit: usize,
        set_start: usize,
        set_limit: usize,
        depth: usize,
    ) -> Result<()> {
        if set_start >= set_limit {
            return Err(SpliceError::UnexpectedEof);
        }

        stubs.push(Stub {
            tag: self.binary[set_start],
            del_start,
            del_limit,
            set_start,
            set_limit,
        });

        if path.depth() <= depth {
            return Ok(());
        }

        match ValueTag::from_u8(self.binary[set_start])? {
            ValueTag::Object => self.walk_object(path, stubs, set_start, set_limit, depth),
            ValueTag::Array => self.walk_array(path, stubs, set_start, set_limit, depth),
            // A scalar cannot be descended into; the caller sees the short
            // chain and decides
            _ => Ok(()),
        }
    }

    fn walk_object(
        &self,
        path: &Path,
        stubs: &mut Vec<Stub>,
        set_start: usize,
        set_limit: usize,
        depth: usize,
    ) -> Result<()> {
        let name = match path.component(depth) {
            Component::Field(name) => name,
            Component::Index(_) => return Err(SpliceError::TypeMismatch),
        };

        let (body, used) = decode_varint(&self.binary[set_start + 1..set_limit])?;
        let body_end = (set_start + 1 + used)
            .checked_add(body as usize)
            .ok_or(SpliceError::BodyOverrun)?;

        if body_end > set_limit {
            return Err(SpliceError::BodyOverrun);
        }

        let mut cur = set_start + 1 + used;

        while cur < body_end {
            if self.binary[cur] != TAG_STRING {
                return Err(SpliceError::KeyNotString);
            }

            let (key_len, key_used) = decode_varint(&self.binary[cur + 1..body_end])?;
            let key_payload = cur + 1 + key_used;
            let key_limit = key_payload
                .checked_add(key_len as usize)
                .ok_or(SpliceError::BodyOverrun)?;

            // A key may not run to the body end; a value always follows
            if key_limit >= body_end {
                return Err(SpliceError::BodyOverrun);
            }

            let val_start = key_limit;
            let val_limit = val_start + self.value_size(val_start, body_end)?;

            if name.as_bytes() == &self.binary[key_payload..key_limit] {
                return self.walk_value(path, stubs, cur, val_limit, val_start, val_limit, depth + 1);
            }

            cur = val_limit;
        }

        // Member absent: parent found, child missing
        Ok(())
    }

    fn walk_array(
        &self,
        path: &Path,
        stubs: &mut Vec<Stub>,
        set_start: usize,
        set_limit: usize,
        depth: usize,
    ) -> Result<()> {
        let index = match path.component(depth) {
            Component::Index(index) => *index,
            Component::Field(_) => return Err(SpliceError::TypeMismatch),
        };

        let (body, used) = decode_varint(&self.binary[set_start + 1..set_limit])?;
        let body_end = (set_start + 1 + used)
            .checked_add(body as usize)
            .ok_or(SpliceError::BodyOverrun)?;

        if body_end > set_limit {
            return Err(SpliceError::BodyOverrun);
        }

        let mut elements = Vec::new();
        let mut cur = set_start + 1 + used;

        while cur < body_end {
            let limit = cur + self.value_size(cur, body_end)?;
            elements.push((cur, limit));
            cur = limit;
        }

        let count = elements.len() as i64;
        let normalized = if index < 0 {
            index.checked_add(count).unwrap_or(-1)
        } else {
            index
        };

        if normalized < 0 || normalized >= count {
            return Err(SpliceError::PathNotFound);
        }

        let (elem_start, elem_limit) = elements[normalized as usize];
        self.walk_value(path, stubs, elem_start, elem_limit, elem_start, elem_limit, depth + 1)
    }

    /// Full byte size of the value starting at `start`, per the child-size
    /// table of the format
    fn value_size(&self, start: usize, limit: usize) -> Result<usize> {
        let size = match ValueTag::from_u8(self.binary[start])? {
            ValueTag::Object | ValueTag::Array | ValueTag::String => {
                let (body, used) = decode_varint(&self.binary[start + 1..limit])?;
                (1 + used)
                    .checked_add(body as usize)
                    .ok_or(SpliceError::BodyOverrun)?
            }
            ValueTag::Double => DOUBLE_SIZE,
            ValueTag::Integer => {
                let (_, used) = decode_varint(&self.binary[start + 1..limit])?;
                1 + used
            }
            ValueTag::True | ValueTag::False | ValueTag::Null => 1,
        };

        if size > limit - start {
            return Err(SpliceError::BodyOverrun);
        }

        Ok(size)
    }

    /// Rebuild the document with `cut_start..cut_limit` replaced by the
    /// concatenation of `segments`, repairing every enclosing length
    /// prefix.
    ///
    /// The new buffer is assembled back to front: first the suffix beyond
    /// the cut, then the replacement segments, then — walking the stub
    /// chain innermost to outermost — each ancestor's leading bytes with a
    /// re-encoded varint. `diff` tracks the net growth seen by the next
    /// ancestor out and absorbs each varint's own width change.
    fn rebuild(
        &self,
        stubs: &[Stub],
        cut_start: usize,
        cut_limit: usize,
        segments: &[&[u8]],
    ) -> Result<Vec<u8>> {
        let replacement: usize = segments.iter().map(|s| s.len()).sum();
        let capacity = self.binary.len()
            + replacement
            + varint_length(replacement as u64) * (stubs.len() + 1);

        let mut scratch = vec![0u8; capacity];
        let mut write = capacity;

        let suffix = &self.binary[cut_limit..];
        write -= suffix.len();
        scratch[write..write + suffix.len()].copy_from_slice(suffix);

        for segment in segments.iter().rev() {
            write -= segment.len();
            scratch[write..write + segment.len()].copy_from_slice(segment);
        }

        let mut diff = replacement as i64 - (cut_limit - cut_start) as i64;
        let mut prev = cut_start;

        for stub in stubs.iter().rev() {
            if stub.set_start >= prev {
                continue;
            }

            let (body, used) = decode_varint(&self.binary[stub.set_start + 1..prev])?;
            let varint_end = stub.set_start + 1 + used;

            if varint_end.checked_add(body as usize) != Some(stub.set_limit) {
                return Err(SpliceError::BodyOverrun);
            }

            let head = &self.binary[varint_end..prev];
            write -= head.len();
            scratch[write..write + head.len()].copy_from_slice(head);

            let grown = body as i64 + diff;

            if grown < 0 {
                return Err(SpliceError::BodyOverrun);
            }

            let patched = encode_varint(grown as u64);
            write -= patched.len();
            scratch[write..write + patched.len()].copy_from_slice(&patched);
            write -= 1;
            scratch[write] = stub.tag;

            diff += patched.len() as i64 - used as i64;
            prev = stub.set_start;
        }

        Ok(scratch.split_off(write))
    }

    /// Swap in a rebuilt buffer, resetting an emptied document to the
    /// empty object
    fn commit(&mut self, rebuilt: Vec<u8>) {
        self.binary = rebuilt;

        if self.binary.is_empty() {
            self.binary = EMPTY_OBJECT.to_vec();
        }
    }
}
