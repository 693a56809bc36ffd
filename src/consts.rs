//! # Constants
//!
//! Byte-offset layout of the on-disk container header, the fixed magic and
//! version constants, and the key-derivation parameters.
//!
//! Container layout:
//!
//! | Magic ID | Version | Init Vector | Password Salt | Header Length | Encrypted body | Payload |
//! |  10 B    |  2 B    |   16 B      |     8 B       |   2 B (LE)    |  PKCS7 padded  |   ...   |

/// Fixed magic bytes identifying a container file.
pub const MAGIC_ID: [u8; 10] = [6, 6, 6, 1, 1, 1, 3, 3, 3, 5];

/// On-disk format version. Anything else is rejected rather than misparsed.
pub const FORMAT_VERSION: [u8; 2] = [3, 0];

pub const MAGIC_ID_OFFSET: usize = 0;
pub const MAGIC_ID_SIZE: usize = 10;

pub const VERSION_OFFSET: usize = MAGIC_ID_OFFSET + MAGIC_ID_SIZE;
pub const VERSION_SIZE: usize = 2;

pub const IV_OFFSET: usize = VERSION_OFFSET + VERSION_SIZE;
pub const IV_SIZE: usize = 16;

pub const SALT_OFFSET: usize = IV_OFFSET + IV_SIZE;
pub const SALT_SIZE: usize = 8;

pub const HEADER_LEN_OFFSET: usize = SALT_OFFSET + SALT_SIZE;
pub const HEADER_LEN_SIZE: usize = 2;

/// Size of the unencrypted header region; the encrypted body starts here.
pub const UNENCRYPTED_HEADER_LEN: usize = HEADER_LEN_OFFSET + HEADER_LEN_SIZE;

// Encrypted body layout — offsets relative to the start of the body.

pub const MOD_TIME_OFFSET: usize = 0;
pub const MOD_TIME_SIZE: usize = 8;

pub const NAME_LEN_OFFSET: usize = MOD_TIME_OFFSET + MOD_TIME_SIZE;
pub const NAME_LEN_SIZE: usize = 1;

pub const NAME_OFFSET: usize = NAME_LEN_OFFSET + NAME_LEN_SIZE;

/// Maximum length of the original file name stored in the header.
pub const MAX_NAME_LEN: usize = 255;

/// AES block size; the CBC and CTR primitives both operate on 16-byte blocks.
pub const BLOCK_SIZE: usize = 16;

/// PBKDF2-HMAC-SHA1 iteration count (Rfc2898DeriveBytes parity).
pub const PBKDF2_ITERATIONS: u32 = 1000;

/// Derived key length — 16 bytes, an AES-128 key.
pub const KEY_SIZE: usize = 16;

/// Default streaming read buffer size in bytes.
pub const DEFAULT_READ_BUFFER: usize = 10_240;

/// Default streaming write buffer size in bytes.
pub const DEFAULT_WRITE_BUFFER: usize = 10_240;

/// Default number of random-overwrite passes before deleting a source file.
pub const DEFAULT_WIPE_PASSES: u32 = 2;

/// Default prefix for generated container file names.
pub const DEFAULT_FILE_PREFIX: &str = "DataSafe";

/// Extension given to generated container file names.
pub const CONTAINER_EXTENSION: &str = "enc";

/// Suffix of the sidecar error log written next to a failing file.
pub const SIDECAR_LOG_SUFFIX: &str = "_DataSafeLog.txt";

/// Upper bound on unique-name probing before giving up with `NameExhausted`.
pub const MAX_NAME_ATTEMPTS: u32 = 65_535;
