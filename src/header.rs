//! # Container Header
//!
//! Builds and parses the container header. The header is partly plaintext
//! (discovery fields: magic, version, IV, salt, length) and partly
//! cipher-protected (original file name and modification time), encrypted
//! with the same key and IV as the file payload.
//!
//! There is no authentication tag: decryption "succeeding" structurally is
//! the only integrity check, so a wrong password and a corrupted file are
//! reported identically.

use crate::aliases::{Iv16, Password, PayloadKey, Salt8};
use crate::consts::{
    FORMAT_VERSION, MAGIC_ID, MAGIC_ID_SIZE, MAX_NAME_LEN, MOD_TIME_SIZE, NAME_LEN_OFFSET,
    NAME_OFFSET, UNENCRYPTED_HEADER_LEN, VERSION_SIZE,
};
use crate::crypto::{cbc, kdf, rng};
use crate::error::DataSafeError;
use crate::utils::read_full;

use std::io::Read;

/// Length of the self-describing prefix: magic plus format version.
pub const PREFIX_LEN: usize = MAGIC_ID_SIZE + VERSION_SIZE;

/// Per-file metadata carried inside a container.
///
/// The stored header-length field counts the unencrypted region plus the
/// *unpadded* body (38 + 8 + 1 + name length); the on-disk encrypted body
/// is PKCS7-padded, so [`payload_offset`](Self::payload_offset) is where
/// the ciphertext payload actually begins.
#[derive(Debug, Clone)]
pub struct EncryptionHeader {
    original_file_name: String,
    modified_unix_time: i64,
    iv: Iv16,
    salt: Salt8,
    total_header_len: u16,
}

impl EncryptionHeader {
    /// Start a header for an encryption operation.
    ///
    /// Fails if the name is empty, not ASCII, or longer than 255 bytes.
    /// Non-ASCII names cannot be represented in the on-disk format; the
    /// caller decides whether to transliterate or refuse.
    pub fn new(original_file_name: &str, modified_unix_time: i64) -> Result<Self, DataSafeError> {
        if original_file_name.is_empty() {
            return Err(DataSafeError::InvalidHeaderField(
                "original file name is empty".into(),
            ));
        }
        if !original_file_name.is_ascii() {
            return Err(DataSafeError::InvalidHeaderField(format!(
                "original file name {original_file_name:?} is not ASCII"
            )));
        }
        if original_file_name.len() > MAX_NAME_LEN {
            return Err(DataSafeError::InvalidHeaderField(format!(
                "original file name is {} bytes, maximum is {MAX_NAME_LEN}",
                original_file_name.len()
            )));
        }

        let body_len = MOD_TIME_SIZE + 1 + original_file_name.len();

        Ok(Self {
            original_file_name: original_file_name.to_string(),
            modified_unix_time,
            iv: [0u8; 16],
            salt: [0u8; 8],
            total_header_len: (UNENCRYPTED_HEADER_LEN + body_len) as u16,
        })
    }

    /// Produce the full header byte sequence, ready to be written verbatim
    /// ahead of the payload.
    ///
    /// Generates a fresh salt, derives the AES-128 key from `password`,
    /// and encrypts the body with the supplied IV. The derived key is
    /// returned so the caller can stream the payload without deriving
    /// twice — payload and header body share key and IV by design.
    pub fn encode(
        &mut self,
        iv: Iv16,
        password: &Password,
    ) -> Result<(Vec<u8>, PayloadKey), DataSafeError> {
        self.iv = iv;
        self.salt = rng::random_salt();
        let key = kdf::derive_key(password, &self.salt)?;

        let name = self.original_file_name.as_bytes();
        let mut body = Vec::with_capacity(MOD_TIME_SIZE + 1 + name.len());
        body.extend_from_slice(&self.modified_unix_time.to_le_bytes());
        body.push(name.len() as u8);
        body.extend_from_slice(name);

        let encrypted_body = cbc::encrypt_buf(&key, &self.iv, &body);

        let mut header = Vec::with_capacity(UNENCRYPTED_HEADER_LEN + encrypted_body.len());
        header.extend_from_slice(&MAGIC_ID);
        header.extend_from_slice(&FORMAT_VERSION);
        header.extend_from_slice(&self.iv);
        header.extend_from_slice(&self.salt);
        header.extend_from_slice(&self.total_header_len.to_le_bytes());
        header.extend_from_slice(&encrypted_body);

        Ok((header, key))
    }

    /// Parse a header from `reader`, which must be positioned at the start
    /// of the container.
    ///
    /// On success the reader is positioned exactly at the payload start,
    /// and the derived key is returned alongside the header.
    pub fn parse<R: Read>(
        reader: &mut R,
        password: &Password,
    ) -> Result<(Self, PayloadKey), DataSafeError> {
        probe(reader)?;

        let mut fixed = [0u8; UNENCRYPTED_HEADER_LEN - PREFIX_LEN];
        if read_full(reader, &mut fixed)? < fixed.len() {
            return Err(DataSafeError::CorruptHeader(
                "file ends inside the fixed header region".into(),
            ));
        }

        let mut iv = [0u8; 16];
        iv.copy_from_slice(&fixed[..16]);
        let mut salt = [0u8; 8];
        salt.copy_from_slice(&fixed[16..24]);
        let total_header_len = u16::from_le_bytes([fixed[24], fixed[25]]);

        if (total_header_len as usize) <= UNENCRYPTED_HEADER_LEN {
            return Err(DataSafeError::CorruptHeader(format!(
                "stored header length {total_header_len} leaves no room for the encrypted body"
            )));
        }
        let body_len = total_header_len as usize - UNENCRYPTED_HEADER_LEN;

        let mut encrypted_body = vec![0u8; cbc::padded_len(body_len)];
        if read_full(reader, &mut encrypted_body)? < encrypted_body.len() {
            return Err(DataSafeError::CorruptHeader(
                "file ends inside the encrypted header body".into(),
            ));
        }

        let key = kdf::derive_key(password, &salt)?;
        let body = cbc::decrypt_buf(&key, &iv, &encrypted_body)?;

        // Structural validation — the only tamper evidence this format has.
        if body.len() != body_len || body.len() < NAME_OFFSET {
            return Err(DataSafeError::WrongPasswordOrCorrupt);
        }
        let name_len = body[NAME_LEN_OFFSET] as usize;
        if NAME_OFFSET + name_len > body.len() {
            return Err(DataSafeError::WrongPasswordOrCorrupt);
        }
        let name_bytes = &body[NAME_OFFSET..NAME_OFFSET + name_len];
        if name_bytes.is_empty() || !name_bytes.is_ascii() {
            return Err(DataSafeError::WrongPasswordOrCorrupt);
        }

        let mut time_bytes = [0u8; MOD_TIME_SIZE];
        time_bytes.copy_from_slice(&body[..MOD_TIME_SIZE]);

        let header = Self {
            original_file_name: String::from_utf8_lossy(name_bytes).into_owned(),
            modified_unix_time: i64::from_le_bytes(time_bytes),
            iv,
            salt,
            total_header_len,
        };

        Ok((header, key))
    }

    /// The file name the plaintext had before encryption.
    pub fn original_file_name(&self) -> &str {
        &self.original_file_name
    }

    /// Original modification time, Unix seconds.
    pub fn modified_unix_time(&self) -> i64 {
        self.modified_unix_time
    }

    pub fn iv(&self) -> &Iv16 {
        &self.iv
    }

    pub fn salt(&self) -> &Salt8 {
        &self.salt
    }

    /// The stored header-length field: 38 plus the unpadded body size.
    pub fn total_header_len(&self) -> u16 {
        self.total_header_len
    }

    /// Byte offset where the encrypted payload begins.
    pub fn payload_offset(&self) -> u64 {
        let body_len = self.total_header_len as usize - UNENCRYPTED_HEADER_LEN;
        (UNENCRYPTED_HEADER_LEN + cbc::padded_len(body_len)) as u64
    }
}

/// Check the fixed magic and version prefix, consuming exactly
/// [`PREFIX_LEN`] bytes on success.
///
/// Rejection happens before any key derivation; this is what the
/// file-classification query uses.
pub fn probe<R: Read>(reader: &mut R) -> Result<(), DataSafeError> {
    let mut prefix = [0u8; PREFIX_LEN];
    if read_full(reader, &mut prefix)? < PREFIX_LEN {
        return Err(DataSafeError::InvalidFormat);
    }
    if prefix[..MAGIC_ID_SIZE] != MAGIC_ID || prefix[MAGIC_ID_SIZE..] != FORMAT_VERSION {
        return Err(DataSafeError::InvalidFormat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::password;
    use std::io::Cursor;

    #[test]
    fn stored_length_counts_unpadded_body() {
        // "report.docx" is 11 bytes: 38 + 8 + 1 + 11 = 58.
        let mut header = EncryptionHeader::new("report.docx", 1_700_000_000).unwrap();
        let (bytes, _) = header.encode([4u8; 16], &password("pw")).unwrap();

        assert_eq!(header.total_header_len(), 58);
        assert_eq!(&bytes[..10], &MAGIC_ID);
        assert_eq!(&bytes[10..12], &FORMAT_VERSION);
        assert_eq!(u16::from_le_bytes([bytes[36], bytes[37]]), 58);
        // On disk the 20-byte body pads to 32.
        assert_eq!(bytes.len(), 38 + 32);
        assert_eq!(header.payload_offset(), 70);
    }

    #[test]
    fn roundtrip_preserves_name_and_time() {
        let pw = password("round-trip");
        let mut header = EncryptionHeader::new("holiday photo.jpg", -12345).unwrap();
        let (bytes, key) = header.encode([9u8; 16], &pw).unwrap();

        let mut cursor = Cursor::new(&bytes);
        let (parsed, parsed_key) = EncryptionHeader::parse(&mut cursor, &pw).unwrap();

        assert_eq!(parsed.original_file_name(), "holiday photo.jpg");
        assert_eq!(parsed.modified_unix_time(), -12345);
        assert_eq!(parsed.iv(), &[9u8; 16]);
        assert_eq!(*key, *parsed_key);
        // Reader consumed exactly the header.
        assert_eq!(cursor.position(), parsed.payload_offset());
    }

    #[test]
    fn wrong_password_is_detected() {
        let mut header = EncryptionHeader::new("secret.txt", 0).unwrap();
        let (bytes, _) = header.encode([1u8; 16], &password("right")).unwrap();

        let err =
            EncryptionHeader::parse(&mut Cursor::new(&bytes), &password("wrong")).unwrap_err();
        assert!(matches!(err, DataSafeError::WrongPasswordOrCorrupt));
    }

    #[test]
    fn bad_magic_rejected_without_kdf() {
        let err = probe(&mut Cursor::new(b"AESAESAESAES")).unwrap_err();
        assert!(matches!(err, DataSafeError::InvalidFormat));

        // Right magic, wrong version.
        let mut bytes = MAGIC_ID.to_vec();
        bytes.extend_from_slice(&[9, 9]);
        let err = probe(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, DataSafeError::InvalidFormat));
    }

    #[test]
    fn short_input_is_invalid_format() {
        let err = probe(&mut Cursor::new(b"AES")).unwrap_err();
        assert!(matches!(err, DataSafeError::InvalidFormat));
    }

    #[test]
    fn inconsistent_length_field_is_corrupt() {
        let mut header = EncryptionHeader::new("a.txt", 0).unwrap();
        let (mut bytes, _) = header.encode([1u8; 16], &password("pw")).unwrap();
        // Stored length <= 38 means no body at all.
        bytes[36] = 38;
        bytes[37] = 0;

        let err = EncryptionHeader::parse(&mut Cursor::new(&bytes), &password("pw")).unwrap_err();
        assert!(matches!(err, DataSafeError::CorruptHeader(_)));
    }

    #[test]
    fn truncated_body_is_corrupt() {
        let mut header = EncryptionHeader::new("a.txt", 0).unwrap();
        let (bytes, _) = header.encode([1u8; 16], &password("pw")).unwrap();

        let err = EncryptionHeader::parse(&mut Cursor::new(&bytes[..40]), &password("pw"))
            .unwrap_err();
        assert!(matches!(err, DataSafeError::CorruptHeader(_)));
    }

    #[test]
    fn name_validation() {
        assert!(matches!(
            EncryptionHeader::new("", 0).unwrap_err(),
            DataSafeError::InvalidHeaderField(_)
        ));
        assert!(matches!(
            EncryptionHeader::new("héllo.txt", 0).unwrap_err(),
            DataSafeError::InvalidHeaderField(_)
        ));
        let long = "x".repeat(256);
        assert!(matches!(
            EncryptionHeader::new(&long, 0).unwrap_err(),
            DataSafeError::InvalidHeaderField(_)
        ));
        // 255 bytes exactly is fine.
        let max = "x".repeat(255);
        assert!(EncryptionHeader::new(&max, 0).is_ok());
    }
}
