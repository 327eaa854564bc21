//! ObjectId

use std::{
    env, fmt, fs,
    hash::{Hash, Hasher},
    result,
    sync::atomic::{AtomicU32, Ordering},
    time::SystemTime,
};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::{thread_rng, Rng};
use thiserror::Error;

const TIMESTAMP_SIZE: usize = 4;
const MACHINE_SIZE: usize = 3;
const PID_SIZE: usize = 2;
const COUNTER_SIZE: usize = 3;

const TIMESTAMP_OFFSET: usize = 0;
const MACHINE_OFFSET: usize = TIMESTAMP_OFFSET + TIMESTAMP_SIZE;
const PID_OFFSET: usize = MACHINE_OFFSET + MACHINE_SIZE;
const COUNTER_OFFSET: usize = PID_OFFSET + PID_SIZE;

const MAX_U24: u32 = 0xFF_FFFF;

static OID_COUNTER: Lazy<AtomicU32> =
    Lazy::new(|| AtomicU32::new(thread_rng().gen_range(0..=MAX_U24)));

/// First three bytes of a stable hash of the hostname.
///
/// Failing to determine a hostname is fatal, surfaced as a panic the first
/// time an id is generated.
static MACHINE_ID: Lazy<[u8; 3]> = Lazy::new(|| {
    let hostname =
        hostname().unwrap_or_else(|| panic!("failed to determine a hostname for the machine id"));
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    hostname.hash(&mut hasher);
    let sum = hasher.finish().to_be_bytes();
    [sum[0], sum[1], sum[2]]
});

fn hostname() -> Option<String> {
    for var in ["HOSTNAME", "COMPUTERNAME"] {
        if let Ok(name) = env::var(var) {
            if !name.trim().is_empty() {
                return Some(name.trim().to_owned());
            }
        }
    }
    for path in ["/proc/sys/kernel/hostname", "/etc/hostname"] {
        if let Ok(name) = fs::read_to_string(path) {
            if !name.trim().is_empty() {
                return Some(name.trim().to_owned());
            }
        }
    }
    None
}

/// Errors that can occur during ObjectId construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An invalid argument was passed in.
    #[error("{message}")]
    Argument { message: String },

    /// An error occurred parsing a hex string.
    #[error(transparent)]
    FromHex(#[from] hex::FromHexError),
}

/// Alias for `Result<T, oid::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// A 12-byte unique identifier.
///
/// Laid out as a 4-byte big-endian timestamp in seconds since the epoch, a
/// 3-byte machine id, a 2-byte big-endian process id, and a 3-byte big-endian
/// counter. While BSON itself is little-endian, these fields are big-endian,
/// with the most significant bytes first.
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct ObjectId {
    id: [u8; 12],
}

impl ObjectId {
    /// Generates a new unique id.
    ///
    /// # Panics
    ///
    /// Panics if no hostname can be determined for the machine id part.
    pub fn new() -> ObjectId {
        let timestamp: u32 = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("system clock is before 1970")
            .as_secs() as u32;
        let counter = OID_COUNTER.fetch_add(1, Ordering::SeqCst) & MAX_U24;

        let mut buf = [0u8; 12];
        buf[TIMESTAMP_OFFSET..MACHINE_OFFSET].copy_from_slice(&timestamp.to_be_bytes());
        buf[MACHINE_OFFSET..PID_OFFSET].copy_from_slice(&MACHINE_ID[..]);
        buf[PID_OFFSET..COUNTER_OFFSET]
            .copy_from_slice(&(std::process::id() as u16).to_be_bytes());
        buf[COUNTER_OFFSET..COUNTER_OFFSET + COUNTER_SIZE]
            .copy_from_slice(&counter.to_be_bytes()[1..]);
        ObjectId::from_bytes(buf)
    }

    /// Builds an id whose timestamp part is taken from `time` and whose
    /// other parts are zeroed.
    ///
    /// Such an id is not unique and should not identify stored data; it is
    /// useful for range queries against ids generated before or after the
    /// given time.
    pub fn with_timestamp(time: DateTime<Utc>) -> ObjectId {
        let mut buf = [0u8; 12];
        buf[TIMESTAMP_OFFSET..MACHINE_OFFSET]
            .copy_from_slice(&(time.timestamp() as u32).to_be_bytes());
        ObjectId::from_bytes(buf)
    }

    /// Constructs an id from its raw byte representation.
    pub fn from_bytes(bytes: [u8; 12]) -> ObjectId {
        ObjectId { id: bytes }
    }

    /// Parses an id from its 24-character hexadecimal representation.
    pub fn from_hex(s: &str) -> Result<ObjectId> {
        let bytes: Vec<u8> = hex::decode(s.as_bytes())?;
        let byte_array: [u8; 12] = bytes.try_into().map_err(|_| Error::Argument {
            message: "id must be a 24-character hexadecimal string".to_owned(),
        })?;
        Ok(ObjectId::from_bytes(byte_array))
    }

    /// The raw byte representation of the id.
    pub fn bytes(&self) -> [u8; 12] {
        self.id
    }

    /// The hexadecimal representation of the id.
    pub fn to_hex(&self) -> String {
        hex::encode(self.id)
    }

    /// The timestamp part of the id.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.id[TIMESTAMP_OFFSET..MACHINE_OFFSET]);
        let seconds_since_epoch = u32::from_be_bytes(buf);
        DateTime::from_timestamp(seconds_since_epoch as i64, 0)
            .expect("u32 seconds since the epoch are representable")
    }

    /// The 3-byte machine id part of the id.
    pub fn machine(&self) -> [u8; 3] {
        let mut buf = [0u8; 3];
        buf.copy_from_slice(&self.id[MACHINE_OFFSET..PID_OFFSET]);
        buf
    }

    /// The process id part of the id.
    pub fn pid(&self) -> u16 {
        let mut buf = [0u8; 2];
        buf.copy_from_slice(&self.id[PID_OFFSET..COUNTER_OFFSET]);
        u16::from_be_bytes(buf)
    }

    /// The counter part of the id.
    pub fn counter(&self) -> u32 {
        let mut buf = [0u8; 4];
        buf[1..].copy_from_slice(&self.id[COUNTER_OFFSET..]);
        u32::from_be_bytes(buf)
    }
}

/// The all-zero id, the empty value a decoded field is reset to.
impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::from_bytes([0; 12])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ObjectId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ObjectId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> result::Result<Self, D::Error> {
        let hex: String = serde::Deserialize::deserialize(deserializer)?;
        ObjectId::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
