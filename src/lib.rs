//! An implementation of the FrodoKEM post-quantum key encapsulation algorithm.
//!
//! FrodoKEM is an IND-CCA2 key encapsulation mechanism whose security rests
//! on the Learning-With-Errors problem over an unstructured matrix. Six
//! parameter sets are exposed, pairing the 640/976/1344 lattice dimensions
//! with either an AES-128 or a SHAKE-128 expansion of the public matrix.
//!
//! ```
//! use frodokem::FrodoKem;
//! use rand_chacha::ChaChaRng;
//! use rand_core::SeedableRng;
//!
//! let kem = FrodoKem::frodo640_aes();
//! let mut rng = ChaChaRng::seed_from_u64(0xDEADBEEF);
//! let (pk, sk) = kem.key_gen(&mut rng);
//! let (ct, ss) = kem.encapsulate(&pk, &mut rng)?;
//! assert_eq!(kem.decapsulate(&sk, &ct)?, ss);
//! # Ok::<(), frodokem::Error>(())
//! ```

use cmov::{Cmov, CmovEq};
use rand_core::CryptoRngCore;
use sha3::digest::{ExtendableOutput, Update};
use sha3::{Shake128, Shake256};
use zeroize::Zeroize;

use crate::matrix::{decode, encode, pack, u16_words_le, unpack, Mat, SignedMat};
use crate::params::{Params, Xof};

mod gen;
mod matrix;
mod params;
mod sample;

#[cfg(feature = "kem")]
pub mod kem;

/// Domain separator for expanding key-generation noise from seedSE.
const SEP_KEYGEN: u8 = 0x5f;
/// Domain separator for expanding encapsulation noise from seedSE.
const SEP_ENCAPS: u8 = 0x96;

/// The errors surfaced by the KEM operations.
///
/// An invalid-but-well-sized ciphertext is deliberately *not* an error:
/// decapsulation then derives a pseudorandom shared secret from the secret
/// key instead (implicit rejection), which the IND-CCA2 construction
/// requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The public key handed to encapsulation has the wrong length.
    #[error("incorrect public key length")]
    PublicKeyLength,
    /// The ciphertext handed to decapsulation has the wrong length.
    #[error("incorrect cipher length")]
    CiphertextLength,
    /// The secret key handed to decapsulation has the wrong length.
    #[error("incorrect secret key length")]
    SecretKeyLength,
}

/// A FrodoKEM parameter set, the handle for the three KEM operations.
///
/// The handle is stateless: keys, ciphertexts and shared secrets are plain
/// byte strings owned by the caller, and randomness is injected per call,
/// so distinct operations may run in parallel without synchronization.
#[derive(Clone, Copy, Debug)]
pub struct FrodoKem {
    params: &'static Params,
}

impl FrodoKem {
    /// FrodoKEM-640 with the AES-128 matrix generator (NIST level 1).
    pub fn frodo640_aes() -> FrodoKem {
        FrodoKem { params: &params::FRODO640_AES }
    }

    /// FrodoKEM-640 with the SHAKE-128 matrix generator (NIST level 1).
    pub fn frodo640_shake() -> FrodoKem {
        FrodoKem { params: &params::FRODO640_SHAKE }
    }

    /// FrodoKEM-976 with the AES-128 matrix generator (NIST level 3).
    pub fn frodo976_aes() -> FrodoKem {
        FrodoKem { params: &params::FRODO976_AES }
    }

    /// FrodoKEM-976 with the SHAKE-128 matrix generator (NIST level 3).
    pub fn frodo976_shake() -> FrodoKem {
        FrodoKem { params: &params::FRODO976_SHAKE }
    }

    /// FrodoKEM-1344 with the AES-128 matrix generator (NIST level 5).
    pub fn frodo1344_aes() -> FrodoKem {
        FrodoKem { params: &params::FRODO1344_AES }
    }

    /// FrodoKEM-1344 with the SHAKE-128 matrix generator (NIST level 5).
    pub fn frodo1344_shake() -> FrodoKem {
        FrodoKem { params: &params::FRODO1344_SHAKE }
    }

    /// The variant name, e.g. `Frodo640AES`.
    pub fn name(&self) -> &'static str {
        self.params.name
    }

    /// Public key length in bytes.
    pub fn public_key_len(&self) -> usize {
        self.params.public_key_len()
    }

    /// Secret key length in bytes.
    pub fn secret_key_len(&self) -> usize {
        self.params.secret_key_len()
    }

    /// Ciphertext length in bytes.
    pub fn ciphertext_len(&self) -> usize {
        self.params.ciphertext_len()
    }

    /// Shared secret length in bytes.
    pub fn shared_secret_len(&self) -> usize {
        self.params.shared_secret_len()
    }

    /// Generates a public/secret key pair using the given RNG.
    ///
    /// It implements FrodoKEM.KeyGen according to the FrodoKEM
    /// specification. The secret key must be kept secret; substituting a
    /// deterministic RNG reproduces a key pair byte for byte.
    pub fn key_gen(&self, mut rng: impl CryptoRngCore) -> (Vec<u8>, Vec<u8>) {
        let p = self.params;

        let mut seeds = vec![0u8; (p.len_s + p.len_seed_se + p.len_z) / 8];
        rng.fill_bytes(&mut seeds);
        let (s, rest) = seeds.split_at(p.len_s / 8);
        let (seed_se, z) = rest.split_at(p.len_seed_se / 8);

        let seed_a = self.shake(&[z], p.len_seed_a / 8);
        let a = gen::expand_a(p, &seed_a);

        let mut r_bytes = self.shake(&[&[SEP_KEYGEN], seed_se], 2 * p.n * p.n_bar * p.len_chi / 8);
        let mut r = u16_words_le(&r_bytes);
        let mut s_t = sample::sample_matrix(p, &r[..p.n * p.n_bar], p.n_bar, p.n);
        let mut s_mat = s_t.transpose();
        let mut e = sample::sample_matrix(p, &r[p.n * p.n_bar..], p.n, p.n_bar);

        // B = A·S + E, packed into the public key behind seedA.
        let b = pack(&a.mul_noise(&s_mat, p.q).add_noise(&e, p.q), p.d);

        let mut pk = Vec::with_capacity(p.public_key_len());
        pk.extend_from_slice(&seed_a);
        pk.extend_from_slice(&b);
        let pkh = self.shake(&[&pk], p.len_pkh / 8);

        // sk = s ‖ seedA ‖ pack(B) ‖ Sᵀ (row-major LE words) ‖ pkh.
        let mut sk = Vec::with_capacity(p.secret_key_len());
        sk.extend_from_slice(s);
        sk.extend_from_slice(&seed_a);
        sk.extend_from_slice(&b);
        for &w in &s_t.v {
            sk.extend_from_slice(&w.to_le_bytes());
        }
        sk.extend_from_slice(&pkh);

        seeds.zeroize();
        r_bytes.zeroize();
        r.zeroize();
        s_t.zeroize();
        s_mat.zeroize();
        e.zeroize();
        (pk, sk)
    }

    /// Generates a ciphertext and an associated shared secret from a public
    /// key and an RNG.
    ///
    /// It implements FrodoKEM.Encaps according to the FrodoKEM
    /// specification. The shared secret must be kept secret.
    pub fn encapsulate(
        &self,
        pk: &[u8],
        mut rng: impl CryptoRngCore,
    ) -> Result<(Vec<u8>, Vec<u8>), Error> {
        let p = self.params;
        if pk.len() != p.public_key_len() {
            return Err(Error::PublicKeyLength);
        }
        let (seed_a, b) = pk.split_at(p.len_seed_a / 8);

        let mut mu = vec![0u8; p.len_mu / 8];
        rng.fill_bytes(&mut mu);

        let pkh = self.shake(&[pk], p.len_pkh / 8);
        let mut se_k = self.shake(&[&pkh, &mu], (p.len_seed_se + p.len_k) / 8);
        let (seed_se, k_bar) = se_k.split_at(p.len_seed_se / 8);

        let (b_p, v) = self.reencrypt(seed_a, b, seed_se);
        let c = v.add(&encode(&mu, p.m_bar, p.n_bar, p.b, p.q), p.q);

        let mut ct = pack(&b_p, p.d);
        ct.extend_from_slice(&pack(&c, p.d));
        let ss = self.shake(&[&ct, k_bar], p.len_ss / 8);

        mu.zeroize();
        se_k.zeroize();
        Ok((ct, ss))
    }

    /// Recovers the shared secret from a ciphertext and the secret key.
    ///
    /// It implements FrodoKEM.Decaps according to the FrodoKEM
    /// specification. Both the valid and the invalid-ciphertext path run
    /// the full re-encryption and the final SHAKE, in time determined only
    /// by the parameter set.
    pub fn decapsulate(&self, sk: &[u8], ct: &[u8]) -> Result<Vec<u8>, Error> {
        let p = self.params;
        if ct.len() != p.ciphertext_len() {
            return Err(Error::CiphertextLength);
        }
        if sk.len() != p.secret_key_len() {
            return Err(Error::SecretKeyLength);
        }

        let (c1, c2) = ct.split_at(p.c1_len());
        let (s, rest) = sk.split_at(p.len_s / 8);
        let (seed_a, rest) = rest.split_at(p.len_seed_a / 8);
        let (b, rest) = rest.split_at(p.d * p.n * p.n_bar / 8);
        let (st_bytes, pkh) = rest.split_at(2 * p.n * p.n_bar);

        let mut s_t = SignedMat {
            rows: p.n_bar,
            cols: p.n,
            v: st_bytes
                .chunks_exact(2)
                .map(|c| i16::from_le_bytes([c[0], c[1]]))
                .collect(),
        };
        let mut s_mat = s_t.transpose();

        let b_p = unpack(c1, p.m_bar, p.n, p.d);
        let c = unpack(c2, p.m_bar, p.n_bar, p.d);
        let mut m = c.sub(&b_p.mul_noise(&s_mat, p.q), p.q);
        let mut mu_p = decode(&m, p.b, p.q);

        let mut se_k = self.shake(&[pkh, &mu_p], (p.len_seed_se + p.len_k) / 8);
        let (seed_se, k_p) = se_k.split_at(p.len_seed_se / 8);

        let (b_pp, v) = self.reencrypt(seed_a, b, seed_se);
        let c_p = v.add(&encode(&mu_p, p.m_bar, p.n_bar, p.b, p.q), p.q);

        // Accumulate the comparison over every coefficient of both
        // matrices, then pick the secret without branching: an early exit
        // would leak where the recomputation diverged.
        let mut good: u8 = 1;
        b_p.v.cmovne(&b_pp.v, 0, &mut good);
        c.v.cmovne(&c_p.v, 0, &mut good);

        // SHAKE(ct ‖ k′) iff the ciphertext re-encrypts exactly,
        // SHAKE(ct ‖ s) otherwise.
        let mut secret = s.to_vec();
        for (dst, src) in secret.iter_mut().zip(k_p) {
            dst.cmovnz(src, good);
        }
        let ss = self.shake(&[ct, &secret], p.len_ss / 8);

        s_t.zeroize();
        s_mat.zeroize();
        m.zeroize();
        mu_p.zeroize();
        se_k.zeroize();
        secret.zeroize();
        Ok(ss)
    }

    /// Expands seedSE into (S′, E′, E″) and computes the pair
    /// (B′ = S′·A + E′, V = S′·B + E″) shared by encapsulation and the
    /// re-encryption half of decapsulation.
    fn reencrypt(&self, seed_a: &[u8], b: &[u8], seed_se: &[u8]) -> (Mat, Mat) {
        let p = self.params;
        let words = 2 * p.m_bar * p.n + p.m_bar * p.n_bar;
        let mut r_bytes = self.shake(&[&[SEP_ENCAPS], seed_se], words * p.len_chi / 8);
        let mut r = u16_words_le(&r_bytes);
        let mut s_p = sample::sample_matrix(p, &r[..p.m_bar * p.n], p.m_bar, p.n);
        let mut e_p = sample::sample_matrix(p, &r[p.m_bar * p.n..2 * p.m_bar * p.n], p.m_bar, p.n);
        let mut e_pp = sample::sample_matrix(p, &r[2 * p.m_bar * p.n..], p.m_bar, p.n_bar);

        let a = gen::expand_a(p, seed_a);
        let b_p = s_p.mul_public(&a, p.q).add_noise(&e_p, p.q);
        let b_mat = unpack(b, p.n, p.n_bar, p.d);
        let v = s_p.mul_public(&b_mat, p.q).add_noise(&e_pp, p.q);

        r_bytes.zeroize();
        r.zeroize();
        s_p.zeroize();
        e_p.zeroize();
        e_pp.zeroize();
        (b_p, v)
    }

    /// Runs the variant's SHAKE over the concatenation of `parts`.
    fn shake(&self, parts: &[&[u8]], out_len: usize) -> Vec<u8> {
        let mut out = vec![0u8; out_len];
        match self.params.xof {
            Xof::Shake128 => {
                let mut xof = Shake128::default();
                for part in parts {
                    xof.update(part);
                }
                xof.finalize_xof_into(&mut out);
            }
            Xof::Shake256 => {
                let mut xof = Shake256::default();
                for part in parts {
                    xof.update(part);
                }
                xof.finalize_xof_into(&mut out);
            }
        }
        out
    }
}
