//! RustCrypto `kem` trait adapters for the six FrodoKEM variants.

use kem::generic_array::typenum::{UInt, UTerm, B0, B1, U16, U24, U32};
use kem::generic_array::GenericArray;
use kem::{Decapsulator, EncappedKey, Encapsulator};
use rand_core::{CryptoRng, RngCore};

use crate::FrodoKem;

#[rustfmt::skip]
pub type U9720 = UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UTerm, B1>, B0>, B0>, B1>, B0>, B1>, B1>, B1>, B1>, B1>, B1>, B0>, B0>, B0>;
#[rustfmt::skip]
pub type U15744 = UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UTerm, B1>, B1>, B1>, B1>, B0>, B1>, B1>, B0>, B0>, B0>, B0>, B0>, B0>, B0>;
#[rustfmt::skip]
pub type U21632 = UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UTerm, B1>, B0>, B1>, B0>, B1>, B0>, B0>, B1>, B0>, B0>, B0>, B0>, B0>, B0>, B0>;

macro_rules! frodo_kem_variant {
    ($mod_name:ident, $marker:ident, $ctor:ident, $doc:literal, $ct_size:ty, $ss_size:ty) => {
        #[doc = $doc]
        pub mod $mod_name {
            use super::*;

            /// A serialized public (encapsulating) key.
            #[derive(Clone, Debug)]
            pub struct EncapsulatingKey {
                pk: Vec<u8>,
            }

            impl EncapsulatingKey {
                /// Wraps a serialized public key.
                pub fn new(pk: Vec<u8>) -> EncapsulatingKey {
                    EncapsulatingKey { pk }
                }
            }

            impl AsRef<[u8]> for EncapsulatingKey {
                fn as_ref(&self) -> &[u8] {
                    &self.pk
                }
            }

            /// A serialized secret (decapsulating) key.
            #[derive(Clone, Debug)]
            pub struct DecapsulatingKey {
                sk: Vec<u8>,
            }

            impl DecapsulatingKey {
                /// Wraps a serialized secret key.
                pub fn new(sk: Vec<u8>) -> DecapsulatingKey {
                    DecapsulatingKey { sk }
                }
            }

            /// The encapsulated form of a shared secret.
            #[derive(Clone, Debug)]
            pub struct EncapsulatedKey {
                ciphertext: Vec<u8>,
            }

            /// Marker type implementing the `kem` traits for this variant.
            #[derive(Clone, Copy, Debug, Default)]
            pub struct $marker;

            impl $marker {
                /// Generates a key pair using the given RNG.
                pub fn key_gen(rng: impl RngCore + CryptoRng) -> (EncapsulatingKey, DecapsulatingKey) {
                    let (pk, sk) = FrodoKem::$ctor().key_gen(rng);
                    (EncapsulatingKey { pk }, DecapsulatingKey { sk })
                }
            }

            impl EncappedKey for EncapsulatedKey {
                type EncappedKeySize = $ct_size;

                type SharedSecretSize = $ss_size;

                type SenderPublicKey = EncapsulatingKey;

                type RecipientPublicKey = EncapsulatingKey;

                fn from_bytes(
                    bytes: &GenericArray<u8, Self::EncappedKeySize>,
                ) -> Result<Self, kem::Error> {
                    Ok(EncapsulatedKey { ciphertext: bytes.to_vec() })
                }
            }

            impl AsRef<[u8]> for EncapsulatedKey {
                fn as_ref(&self) -> &[u8] {
                    &self.ciphertext
                }
            }

            impl Encapsulator<EncapsulatedKey> for $marker {
                fn try_encap<R: CryptoRng + RngCore>(
                    &self,
                    csprng: &mut R,
                    recip_pubkey: &<EncapsulatedKey as EncappedKey>::RecipientPublicKey,
                ) -> Result<(EncapsulatedKey, kem::SharedSecret<EncapsulatedKey>), kem::Error> {
                    let (ct, ss) = FrodoKem::$ctor()
                        .encapsulate(&recip_pubkey.pk, csprng)
                        .map_err(|_| kem::Error)?;
                    let ss = kem::SharedSecret::new(GenericArray::clone_from_slice(&ss));
                    Ok((EncapsulatedKey { ciphertext: ct }, ss))
                }
            }

            impl Decapsulator<EncapsulatedKey> for DecapsulatingKey {
                fn try_decap(
                    &self,
                    encapped_key: &EncapsulatedKey,
                ) -> Result<kem::SharedSecret<EncapsulatedKey>, kem::Error> {
                    FrodoKem::$ctor()
                        .decapsulate(&self.sk, &encapped_key.ciphertext)
                        .map(|ss| kem::SharedSecret::new(GenericArray::clone_from_slice(&ss)))
                        .map_err(|_| kem::Error)
                }
            }
        }
    };
}

frodo_kem_variant!(
    frodo640_aes,
    Frodo640Aes,
    frodo640_aes,
    "FrodoKEM-640-AES through the `kem` traits.",
    U9720,
    U16
);
frodo_kem_variant!(
    frodo640_shake,
    Frodo640Shake,
    frodo640_shake,
    "FrodoKEM-640-SHAKE through the `kem` traits.",
    U9720,
    U16
);
frodo_kem_variant!(
    frodo976_aes,
    Frodo976Aes,
    frodo976_aes,
    "FrodoKEM-976-AES through the `kem` traits.",
    U15744,
    U24
);
frodo_kem_variant!(
    frodo976_shake,
    Frodo976Shake,
    frodo976_shake,
    "FrodoKEM-976-SHAKE through the `kem` traits.",
    U15744,
    U24
);
frodo_kem_variant!(
    frodo1344_aes,
    Frodo1344Aes,
    frodo1344_aes,
    "FrodoKEM-1344-AES through the `kem` traits.",
    U21632,
    U32
);
frodo_kem_variant!(
    frodo1344_shake,
    Frodo1344Shake,
    frodo1344_shake,
    "FrodoKEM-1344-SHAKE through the `kem` traits.",
    U21632,
    U32
);

#[cfg(test)]
mod tests {
    use kem::generic_array::typenum::Unsigned;
    use rand_chacha::ChaChaRng;
    use rand_core::SeedableRng;

    use super::*;

    #[test]
    fn ciphertext_sizes() {
        assert_eq!(U9720::USIZE, FrodoKem::frodo640_aes().ciphertext_len());
        assert_eq!(U15744::USIZE, FrodoKem::frodo976_aes().ciphertext_len());
        assert_eq!(U21632::USIZE, FrodoKem::frodo1344_aes().ciphertext_len());
    }

    #[test]
    fn round_trip() {
        use frodo640_shake::Frodo640Shake;

        let mut rng = ChaChaRng::seed_from_u64(0xDEADBEEF);
        let (ek, dk) = Frodo640Shake::key_gen(&mut rng);
        let (ct, k) = Frodo640Shake.try_encap(&mut rng, &ek).expect("should encapsulate");
        let k_p = dk.try_decap(&ct).expect("should decapsulate");
        assert_eq!(k.as_bytes(), k_p.as_bytes());
    }
}
