//! Account addresses
//!
//! Addresses are the 20-digit decimal form of an unsigned 64-bit key ID,
//! usually grouped by dashes (`0000-0000-0000-0000-0019`). The last digit is
//! a check digit over the first nineteen.

/// Number of digits in a canonical address.
const ADDRESS_DIGITS: usize = 20;

/// Converts an account address into its numeric key ID.
///
/// Implementations must be pure: the same address always yields the same ID.
pub trait AddressDecoder {
    fn decode(&self, address: &str) -> i64;
}

impl<F> AddressDecoder for F
where
    F: Fn(&str) -> i64,
{
    fn decode(&self, address: &str) -> i64 {
        self(address)
    }
}

/// The canonical checksummed address format.
///
/// Invalid addresses (wrong length, non-digits, bad check digit) decode to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumAddress;

impl AddressDecoder for ChecksumAddress {
    fn decode(&self, address: &str) -> i64 {
        address_to_key_id(address)
    }
}

/// Check digit over a run of ASCII digits.
fn check_digit(digits: &[u8]) -> u8 {
    let (mut odd, mut even) = (0u32, 0u32);
    for (i, ch) in digits.iter().enumerate() {
        let digit = u32::from(ch - b'0');
        if i & 1 == 1 {
            odd += digit;
        } else {
            even += digit;
        }
    }
    let sum = (even + 3 * odd) % 10;
    if sum > 0 {
        (10 - sum) as u8
    } else {
        0
    }
}

/// Returns true if `address` is a well-formed, correctly checksummed address.
pub fn is_valid_address(address: &str) -> bool {
    let digits: Vec<u8> = address.bytes().filter(|b| *b != b'-').collect();
    if digits.len() != ADDRESS_DIGITS || !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }
    // 20 digits may still exceed u64::MAX
    let Ok(text) = std::str::from_utf8(&digits) else {
        return false;
    };
    if text.parse::<u64>().is_err() {
        return false;
    }
    let (body, check) = digits.split_at(ADDRESS_DIGITS - 1);
    check_digit(body) == check[0] - b'0'
}

/// Decode an address into a key ID; invalid input yields 0.
///
/// A signed decimal (`"-1234"`) is accepted as a raw key ID and reinterpreted
/// as its unsigned form before validation.
pub fn address_to_key_id(address: &str) -> i64 {
    if address.is_empty() {
        return 0;
    }
    let mut text = address.replace('-', "");
    if address.starts_with('-') {
        match address.parse::<i64>() {
            Ok(id) => text = (id as u64).to_string(),
            Err(_) => return 0,
        }
    }
    if text.len() < ADDRESS_DIGITS {
        text = format!("{text:0>20}");
    }
    if !is_valid_address(&text) {
        return 0;
    }
    text.parse::<u64>().map(|id| id as i64).unwrap_or(0)
}

/// Format a key ID as a dash-grouped 20-digit address.
pub fn key_id_to_address(key_id: i64) -> String {
    let digits = format!("{:020}", key_id as u64);
    digits
        .as_bytes()
        .chunks(4)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_dashed_address() {
        assert_eq!(address_to_key_id("0000-0000-0000-0000-0019"), 19);
        assert_eq!(address_to_key_id("00000000000000000019"), 19);
    }

    #[test]
    fn test_decode_short_address_is_padded() {
        assert_eq!(address_to_key_id("19"), 19);
    }

    #[test]
    fn test_bad_check_digit_decodes_to_zero() {
        assert_eq!(address_to_key_id("0000-0000-0000-0000-0018"), 0);
        assert!(!is_valid_address("0000-0000-0000-0000-0018"));
    }

    #[test]
    fn test_garbage_decodes_to_zero() {
        assert_eq!(address_to_key_id(""), 0);
        assert_eq!(address_to_key_id("not-an-address"), 0);
        assert_eq!(address_to_key_id("99999999999999999999"), 0);
    }

    #[test]
    fn test_signed_key_id() {
        // u64::MAX - 1 carries a valid check digit, u64::MAX does not
        assert_eq!(address_to_key_id("-2"), -2);
        assert_eq!(address_to_key_id(&key_id_to_address(-2)), -2);
        assert_eq!(address_to_key_id("-1"), 0);
    }

    #[test]
    fn test_key_id_to_address_groups_digits() {
        assert_eq!(key_id_to_address(19), "0000-0000-0000-0000-0019");
    }

    #[test]
    fn test_closure_decoder() {
        let decoder = |_: &str| 42i64;
        assert_eq!(decoder.decode("anything"), 42);
        assert_eq!(ChecksumAddress.decode("0000-0000-0000-0000-0019"), 19);
    }
}
