//! Bus access helpers shared by the register banks and local memory.

/// Replaces only the byte lanes of `old` selected by `mask`.
///
/// Models partial-word bus writes: lanes outside `mask` keep their prior value.
#[must_use]
pub const fn masked_write(old: u32, value: u32, mask: u32) -> u32 {
    (old & !mask) | (value & mask)
}

/// Byte-address XOR that maps a big-endian byte address onto host-order word
/// storage.
pub const BYTE_ADDR_XOR: u32 = 3;

/// Returns the shift that selects big-endian byte lane `address & 3` of a word.
#[must_use]
pub const fn byte_lane_shift(address: u32) -> u32 {
    (3 - (address & 3)) * 8
}

/// Reads big-endian byte lane `address & 3` from `word`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn read_byte_lane(word: u32, address: u32) -> u8 {
    (word >> byte_lane_shift(address)) as u8
}

/// Writes big-endian byte lane `address & 3` of `word`.
#[must_use]
pub const fn write_byte_lane(word: u32, address: u32, value: u8) -> u32 {
    let shift = byte_lane_shift(address);
    masked_write(word, (value as u32) << shift, 0xFF << shift)
}

#[cfg(test)]
mod tests {
    use super::{masked_write, read_byte_lane, write_byte_lane};
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x1122_3344, 0xAABB_CCDD, 0xFFFF_FFFF, 0xAABB_CCDD)]
    #[case(0x1122_3344, 0xAABB_CCDD, 0x0000_0000, 0x1122_3344)]
    #[case(0x1122_3344, 0xAABB_CCDD, 0xFF00_0000, 0xAA22_3344)]
    #[case(0x1122_3344, 0xAABB_CCDD, 0x0000_FFFF, 0x1122_CCDD)]
    fn masked_write_replaces_selected_lanes(
        #[case] old: u32,
        #[case] value: u32,
        #[case] mask: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(masked_write(old, value, mask), expected);
    }

    #[test]
    fn byte_lanes_are_big_endian() {
        let word = 0x0102_0304;
        assert_eq!(read_byte_lane(word, 0), 0x01);
        assert_eq!(read_byte_lane(word, 1), 0x02);
        assert_eq!(read_byte_lane(word, 2), 0x03);
        assert_eq!(read_byte_lane(word, 7), 0x04);
        assert_eq!(write_byte_lane(word, 1, 0xEE), 0x01EE_0304);
    }

    proptest! {
        #[test]
        fn masked_write_matches_lane_formula(old in any::<u32>(), value in any::<u32>(), mask in any::<u32>()) {
            let written = masked_write(old, value, mask);
            prop_assert_eq!(written & mask, value & mask);
            prop_assert_eq!(written & !mask, old & !mask);
        }

        #[test]
        fn byte_lane_write_touches_one_lane(word in any::<u32>(), address in any::<u32>(), value in any::<u8>()) {
            let updated = write_byte_lane(word, address, value);
            prop_assert_eq!(read_byte_lane(updated, address), value);
            for lane in 0..4_u32 {
                if lane != address & 3 {
                    prop_assert_eq!(read_byte_lane(updated, lane), read_byte_lane(word, lane));
                }
            }
        }
    }
}
