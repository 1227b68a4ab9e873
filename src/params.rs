//! Parameter bundles for the six FrodoKEM variants.

/// Selects the deterministic generator used to expand `seedA` into the
/// public matrix A.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Gen {
    Shake128,
    Aes128,
}

/// Selects the SHAKE width used for every key-derivation call of a variant.
///
/// Independent of [`Gen`]: the AES variants still derive keys with SHAKE,
/// and A-matrix expansion in the SHAKE variants is always SHAKE-128.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Xof {
    Shake128,
    Shake256,
}

/// An immutable FrodoKEM parameter bundle.
///
/// All `len_*` fields are bit lengths, divided by 8 at the point of use.
/// The modulus `q` is stored in 16 bits with 0 encoding 2¹⁶; every
/// supported modulus is a power of two.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Params {
    pub(crate) name: &'static str,
    /// Lattice dimension.
    pub(crate) n: usize,
    pub(crate) n_bar: usize,
    pub(crate) m_bar: usize,
    pub(crate) q: u16,
    /// Packed bits per matrix coefficient, log₂ q.
    pub(crate) d: usize,
    /// Message bits per coefficient.
    pub(crate) b: usize,
    pub(crate) len_seed_a: usize,
    pub(crate) len_seed_se: usize,
    pub(crate) len_z: usize,
    pub(crate) len_s: usize,
    pub(crate) len_mu: usize,
    pub(crate) len_k: usize,
    pub(crate) len_ss: usize,
    pub(crate) len_pkh: usize,
    /// Bits of uniform randomness consumed per noise sample.
    pub(crate) len_chi: usize,
    /// Cumulative distribution table of the noise distribution χ.
    pub(crate) t_chi: &'static [u16],
    pub(crate) gen: Gen,
    pub(crate) xof: Xof,
}

impl Params {
    /// `seedA ‖ pack(B)`.
    pub(crate) fn public_key_len(&self) -> usize {
        self.len_seed_a / 8 + self.d * self.n * self.n_bar / 8
    }

    /// `s ‖ seedA ‖ pack(B) ‖ Sᵀ ‖ pkh`.
    pub(crate) fn secret_key_len(&self) -> usize {
        self.len_s / 8 + self.public_key_len() + 2 * self.n * self.n_bar + self.len_pkh / 8
    }

    /// `pack(B′) ‖ pack(C)`.
    pub(crate) fn ciphertext_len(&self) -> usize {
        self.c1_len() + self.c2_len()
    }

    pub(crate) fn c1_len(&self) -> usize {
        self.d * self.m_bar * self.n / 8
    }

    pub(crate) fn c2_len(&self) -> usize {
        self.d * self.m_bar * self.n_bar / 8
    }

    pub(crate) fn shared_secret_len(&self) -> usize {
        self.len_ss / 8
    }
}

/// Frodo-640 noise CDF, support [-12, 12].
const CDF_640: &[u16] = &[
    4643, 13363, 20579, 25843, 29227, 31145, 32103, 32525, 32689, 32745, 32762, 32766, 32767,
];

/// Frodo-976 noise CDF, support [-10, 10].
const CDF_976: &[u16] = &[
    5638, 15915, 23689, 28571, 31116, 32217, 32613, 32731, 32760, 32766, 32767,
];

/// Frodo-1344 noise CDF, support [-6, 6].
const CDF_1344: &[u16] = &[9142, 23462, 30338, 32361, 32725, 32765, 32767];

const FRODO640: Params = Params {
    name: "Frodo640SHAKE",
    n: 640,
    n_bar: 8,
    m_bar: 8,
    q: 1 << 15,
    d: 15,
    b: 2,
    len_seed_a: 128,
    len_seed_se: 128,
    len_z: 128,
    len_s: 128,
    len_mu: 128,
    len_k: 128,
    len_ss: 128,
    len_pkh: 128,
    len_chi: 16,
    t_chi: CDF_640,
    gen: Gen::Shake128,
    xof: Xof::Shake128,
};

const FRODO976: Params = Params {
    name: "Frodo976SHAKE",
    n: 976,
    n_bar: 8,
    m_bar: 8,
    q: 0, // 2¹⁶
    d: 16,
    b: 3,
    len_seed_a: 128,
    len_seed_se: 192,
    len_z: 128,
    len_s: 192,
    len_mu: 192,
    len_k: 192,
    len_ss: 192,
    len_pkh: 192,
    len_chi: 16,
    t_chi: CDF_976,
    gen: Gen::Shake128,
    xof: Xof::Shake256,
};

const FRODO1344: Params = Params {
    name: "Frodo1344SHAKE",
    n: 1344,
    n_bar: 8,
    m_bar: 8,
    q: 0, // 2¹⁶
    d: 16,
    b: 4,
    len_seed_a: 128,
    len_seed_se: 256,
    len_z: 128,
    len_s: 256,
    len_mu: 256,
    len_k: 256,
    len_ss: 256,
    len_pkh: 256,
    len_chi: 16,
    t_chi: CDF_1344,
    gen: Gen::Shake128,
    xof: Xof::Shake256,
};

pub(crate) static FRODO640_SHAKE: Params = FRODO640;
pub(crate) static FRODO640_AES: Params = Params { name: "Frodo640AES", gen: Gen::Aes128, ..FRODO640 };
pub(crate) static FRODO976_SHAKE: Params = FRODO976;
pub(crate) static FRODO976_AES: Params = Params { name: "Frodo976AES", gen: Gen::Aes128, ..FRODO976 };
pub(crate) static FRODO1344_SHAKE: Params = FRODO1344;
pub(crate) static FRODO1344_AES: Params =
    Params { name: "Frodo1344AES", gen: Gen::Aes128, ..FRODO1344 };
