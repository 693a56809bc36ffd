// src/crypto/mod.rs

//! Cryptographic building blocks: key derivation, the CBC codec used by
//! the container format, the alternate parallel CTR primitive, string
//! helpers, and OS randomness.

pub mod cbc;
pub mod ctr;
pub mod kdf;
pub mod rng;
pub mod text;
