//! Deterministic expansion of the public matrix A from `seedA`.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use sha3::digest::{ExtendableOutput, Update};
use sha3::Shake128;

use crate::matrix::Mat;
use crate::params::{Gen, Params};

/// Expands `seedA` into the n×n public matrix A using the generator the
/// parameter bundle selects. Both generators are pure functions of the
/// seed.
pub(crate) fn expand_a(params: &Params, seed_a: &[u8]) -> Mat {
    match params.gen {
        Gen::Shake128 => expand_shake(params, seed_a),
        Gen::Aes128 => expand_aes(params, seed_a),
    }
}

/// It implements Frodo.Gen using SHAKE-128 according to the FrodoKEM
/// specification: row i is the first 2n bytes of
/// SHAKE-128(u16 LE i ‖ seedA), read as little-endian words. Always
/// SHAKE-128, even in the variants whose key derivation uses SHAKE-256.
fn expand_shake(params: &Params, seed_a: &[u8]) -> Mat {
    let n = params.n;
    let mask = params.q.wrapping_sub(1);
    let mut a = Mat::zero(n, n);
    let mut row = vec![0u8; 2 * n];
    for i in 0..n {
        let mut xof = Shake128::default();
        xof.update(&(i as u16).to_le_bytes());
        xof.update(seed_a);
        xof.finalize_xof_into(&mut row);
        for j in 0..n {
            a.set(i, j, u16::from_le_bytes([row[2 * j], row[2 * j + 1]]) & mask);
        }
    }
    a
}

/// It implements Frodo.Gen using AES-128 according to the FrodoKEM
/// specification: `seedA` keys the cipher, and the block
/// `u16 LE i ‖ u16 LE j ‖ 0¹²` encrypts to the eight words A[i][j..j+8].
fn expand_aes(params: &Params, seed_a: &[u8]) -> Mat {
    let n = params.n;
    let mask = params.q.wrapping_sub(1);
    let cipher = Aes128::new(GenericArray::from_slice(seed_a));
    let mut a = Mat::zero(n, n);
    let mut block = aes::Block::default();
    for i in 0..n {
        for j in (0..n).step_by(8) {
            block[..2].copy_from_slice(&(i as u16).to_le_bytes());
            block[2..4].copy_from_slice(&(j as u16).to_le_bytes());
            block[4..].fill(0);
            cipher.encrypt_block(&mut block);
            for l in 0..8 {
                a.set(i, j + l, u16::from_le_bytes([block[2 * l], block[2 * l + 1]]) & mask);
            }
        }
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FRODO640_AES, FRODO640_SHAKE, FRODO976_SHAKE};

    const SEED: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];

    #[test]
    fn shake_generator_is_deterministic() {
        let a = expand_a(&FRODO640_SHAKE, &SEED);
        let b = expand_a(&FRODO640_SHAKE, &SEED);
        assert_eq!(a, b);
        // Rows are domain-separated by index.
        assert_ne!(a.v[..640], a.v[640..1280]);
        // Every coefficient is reduced mod 2¹⁵.
        assert!(a.v.iter().all(|&x| x < 1 << 15));
    }

    #[test]
    fn shake_generator_row_layout() {
        // Row i is SHAKE-128(u16 LE i ‖ seedA) read as LE words.
        let a = expand_a(&FRODO976_SHAKE, &SEED);
        let mut row = vec![0u8; 2 * 976];
        let mut xof = Shake128::default();
        xof.update(&3u16.to_le_bytes());
        xof.update(&SEED);
        xof.finalize_xof_into(&mut row);
        for j in 0..976 {
            assert_eq!(a.at(3, j), u16::from_le_bytes([row[2 * j], row[2 * j + 1]]));
        }
    }

    #[test]
    fn aes_generator_block_layout() {
        let a = expand_a(&FRODO640_AES, &SEED);
        // A[0][0..8] comes from encrypting the all-index-zero block.
        let cipher = Aes128::new(GenericArray::from_slice(&SEED));
        let mut block = aes::Block::default();
        cipher.encrypt_block(&mut block);
        for l in 0..8 {
            assert_eq!(
                a.at(0, l),
                u16::from_le_bytes([block[2 * l], block[2 * l + 1]]) & 0x7fff
            );
        }
        // And A[1][8..16] from the (i, j) = (1, 8) block.
        let mut block = aes::Block::default();
        block[..2].copy_from_slice(&1u16.to_le_bytes());
        block[2..4].copy_from_slice(&8u16.to_le_bytes());
        cipher.encrypt_block(&mut block);
        for l in 0..8 {
            assert_eq!(
                a.at(1, 8 + l),
                u16::from_le_bytes([block[2 * l], block[2 * l + 1]]) & 0x7fff
            );
        }
        assert_eq!(expand_a(&FRODO640_AES, &SEED), a);
    }
}
