use derive_more::{Constructor, Display};

use crate::hash::hash64;

/// Seed used when hashing primary key bytes into a routing key.
pub const ROUTING_KEY_SEED: u64 = 97;

const TOKEN_SHIFT: u32 = 48;
const SIGN_BIT: u16 = 0x8000;

/// Compact, 16-bit partition hash code computed from the primary key of a row. Partitions of a
/// table cover contiguous ranges of routing keys.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Default, Debug, Hash, Display, Constructor)]
pub struct RoutingKey {
    pub value: u16,
}

impl RoutingKey {
    /// Hashes serialized primary key bytes (without value length prefixes) into a routing key.
    pub fn from_key_bytes(key_bytes: &[u8]) -> Self {
        Self::from_hash(hash64(ROUTING_KEY_SEED, key_bytes))
    }

    /// Folds a 64-bit hash into a routing key by xoring its four weighted 16-bit windows.
    pub fn from_hash(hash: u64) -> Self {
        let h1 = hash >> 48;
        let h2 = 3 * ((hash >> 32) & 0xffff);
        let h3 = 5 * ((hash >> 16) & 0xffff);
        let h4 = 7 * (hash & 0xffff);

        RoutingKey::new(((h1 ^ h2 ^ h3 ^ h4) & 0xffff) as u16)
    }

    /// Converts the key into the signed 64-bit token space, where it occupies the top 16 bits with
    /// its sign bit flipped.
    #[inline]
    pub fn to_token(self) -> Token {
        Token::new(((self.value ^ SIGN_BIT) as i64) << TOKEN_SHIFT)
    }
}

impl From<Token> for RoutingKey {
    #[inline]
    fn from(token: Token) -> Self {
        RoutingKey::new(((token.value >> TOKEN_SHIFT) as u16) ^ SIGN_BIT)
    }
}

impl From<u16> for RoutingKey {
    #[inline]
    fn from(value: u16) -> Self {
        RoutingKey::new(value)
    }
}

/// A routing key expressed in the 64-bit token space used by token-ordered ring metadata.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Default, Debug, Hash, Display, Constructor)]
pub struct Token {
    pub value: i64,
}

impl From<RoutingKey> for Token {
    #[inline]
    fn from(key: RoutingKey) -> Self {
        key.to_token()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rng, Rng};

    use super::*;

    #[test]
    fn should_fold_golden_hash() {
        let key = RoutingKey::from_key_bytes(b"row-key-1");
        assert_eq!(key, RoutingKey::from_hash(0x16b9_46d6_65a3_a8ea));
        assert_eq!(key.value, 41074);
    }

    #[test]
    fn should_fold_hash_windows() {
        assert_eq!(RoutingKey::from_hash(0).value, 0);
        assert_eq!(RoutingKey::from_hash(0x0001_0000_0000_0000).value, 1);
        assert_eq!(RoutingKey::from_hash(0x0000_0001_0000_0000).value, 3);
        assert_eq!(RoutingKey::from_hash(0x0000_0000_0001_0000).value, 5);
        assert_eq!(RoutingKey::from_hash(0x0000_0000_0000_0001).value, 7);
        assert_eq!(RoutingKey::from_hash(u64::MAX).value, 0xffff ^ 0xfffd ^ 0xfffb ^ 0xfff9);
    }

    #[test]
    fn should_convert_to_token() {
        assert_eq!(RoutingKey::new(0).to_token().value, i64::MIN);
        assert_eq!(RoutingKey::new(0x8000).to_token().value, 0);
        assert_eq!(RoutingKey::new(0xffff).to_token().value, 0x7fff << 48);
        assert_eq!(
            RoutingKey::new(41074).to_token().value,
            0x2072_0000_0000_0000
        );
    }

    #[test]
    fn should_convert_token_back() {
        for value in [0, 1, 0x7fff, 0x8000, 0x8001, 41074, 0xffff] {
            let key = RoutingKey::new(value);
            assert_eq!(RoutingKey::from(key.to_token()), key);
        }
    }

    #[test]
    fn should_change_routing_bits_on_single_bit_flip() {
        let mut rng = rng();
        let trials = 1000;
        let mut unchanged = 0;

        for _ in 0..trials {
            let mut data = [0u8; 24];
            rng.fill(&mut data[..]);
            let original = RoutingKey::from_key_bytes(&data);

            let bit = rng.random_range(0..data.len() * 8);
            data[bit / 8] ^= 1 << (bit % 8);

            if RoutingKey::from_key_bytes(&data) == original {
                unchanged += 1;
            }
        }

        // a collision on 16 bits is expected once in 65536 trials
        assert!(unchanged < trials / 100);
    }
}
