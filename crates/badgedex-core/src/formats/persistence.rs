//! Owned-set snapshot encoding.
//!
//! ```text
//! +------+---------+---------------------------+
//! | BDXO | version | postcard(Vec<String>)     |
//! +------+---------+---------------------------+
//!   4 B     1 B       identifiers, sorted
//! ```

use crate::owned::OwnedSet;
use crate::BadgeError;

/// Leading bytes of every snapshot.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"BDXO";

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u8 = 1;

const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + 1;

/// Encode `owned` as a versioned snapshot.
pub fn encode_owned(owned: &OwnedSet) -> crate::Result<Vec<u8>> {
    let ids: Vec<&str> = owned.ids().collect();
    let body = postcard::to_allocvec(&ids)?;

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.push(SNAPSHOT_VERSION);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a snapshot produced by [`encode_owned`].
pub fn decode_owned(bytes: &[u8]) -> crate::Result<OwnedSet> {
    let Some((header, body)) = bytes.split_at_checked(HEADER_LEN) else {
        return Err(BadgeError::Format(format!(
            "snapshot too short: {} bytes",
            bytes.len()
        )));
    };

    if header[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
        return Err(BadgeError::Format("bad snapshot magic".to_string()));
    }

    let version = header[SNAPSHOT_MAGIC.len()];
    if version != SNAPSHOT_VERSION {
        return Err(BadgeError::Format(format!(
            "unsupported snapshot version {version}"
        )));
    }

    let ids: Vec<String> = postcard::from_bytes(body)?;
    Ok(OwnedSet::from_ids(ids))
}
