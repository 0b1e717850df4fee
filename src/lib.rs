//! Toy RSA arithmetic on a deliberately tiny modulus: key derivation,
//! textbook encryption/decryption (direct and CRT) and recovery of the
//! private key from the public key by trial division.

pub mod config;
pub mod demo;
pub mod rsa;
pub mod util;
