/// Dallas/Maxim CRC-8 lookup table (polynomial x^8 + x^5 + x^4 + 1, reflected).
static CRC8_TABLE: [u8; 256] = [
    0, 94, 188, 226, 97, 63, 221, 131, 194, 156, 126, 32, 163, 253, 31, 65, //
    157, 195, 33, 127, 252, 162, 64, 30, 95, 1, 227, 189, 62, 96, 130, 220, //
    35, 125, 159, 193, 66, 28, 254, 160, 225, 191, 93, 3, 128, 222, 60, 98, //
    190, 224, 2, 92, 223, 129, 99, 61, 124, 34, 192, 158, 29, 67, 161, 255, //
    70, 24, 250, 164, 39, 121, 155, 197, 132, 218, 56, 102, 229, 187, 89, 7, //
    219, 133, 103, 57, 186, 228, 6, 88, 25, 71, 165, 251, 120, 38, 196, 154, //
    101, 59, 217, 135, 4, 90, 184, 230, 167, 249, 27, 69, 198, 152, 122, 36, //
    248, 166, 68, 26, 153, 199, 37, 123, 58, 100, 134, 216, 91, 5, 231, 185, //
    140, 210, 48, 110, 237, 179, 81, 15, 78, 16, 242, 172, 47, 113, 147, 205, //
    17, 79, 173, 243, 112, 46, 204, 146, 211, 141, 111, 49, 178, 236, 14, 80, //
    175, 241, 19, 77, 206, 144, 114, 44, 109, 51, 209, 143, 12, 82, 176, 238, //
    50, 108, 142, 208, 83, 13, 239, 177, 240, 174, 76, 18, 145, 207, 45, 115, //
    202, 148, 118, 40, 171, 245, 23, 73, 8, 86, 180, 234, 105, 55, 213, 139, //
    87, 9, 235, 181, 54, 104, 138, 212, 149, 203, 41, 119, 244, 170, 72, 22, //
    233, 183, 85, 11, 136, 214, 52, 106, 43, 117, 151, 201, 74, 20, 246, 168, //
    116, 42, 200, 150, 21, 75, 169, 247, 182, 232, 10, 84, 215, 137, 107, 53, //
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Calculate CRC-8 used in 1-Wire communications.
pub struct OneWireCrc(u8);

impl OneWireCrc {
    /// Start a new accumulator at zero.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Clear the accumulator.
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) -> u8 {
        self.0 = CRC8_TABLE[(self.0 ^ byte) as usize];
        self.0
    }

    /// Compute the CRC of a sequence of bytes.
    pub fn compute(sequence: &[u8]) -> u8 {
        let mut crc = OneWireCrc::new();
        for &byte in sequence {
            crc.update(byte);
        }
        crc.value()
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    pub fn validate(sequence: &[u8]) -> bool {
        // The CRC of a block that ends with its own CRC is zero.
        Self::compute(sequence) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitwise(byte: u8) -> u8 {
        let mut crc = byte;
        for _ in 0..8 {
            crc = if crc & 0x1 == 0x1 { (crc >> 1) ^ 0x8c } else { crc >> 1 };
        }
        crc
    }

    #[test]
    fn table_matches_polynomial() {
        for i in 0..=255u8 {
            assert_eq!(CRC8_TABLE[i as usize], bitwise(i), "entry {i}");
        }
    }

    #[test]
    fn maxim_reference_rom() {
        // Application note 27 example: family 0x02, serial 0x00000001B81C.
        let rom = [0x02, 0x1c, 0xb8, 0x01, 0x00, 0x00, 0x00];
        assert_eq!(OneWireCrc::compute(&rom), 0xa2);
        assert!(OneWireCrc::validate(&[0x02, 0x1c, 0xb8, 0x01, 0x00, 0x00, 0x00, 0xa2]));
        assert!(!OneWireCrc::validate(&[0x02, 0x1c, 0xb8, 0x01, 0x00, 0x00, 0x00, 0xa3]));
    }

    #[test]
    fn accumulator_is_incremental() {
        let mut crc = OneWireCrc::new();
        for b in [0x28, 0xff, 0x64, 0x1e, 0x0f, 0x00, 0x00] {
            crc.update(b);
        }
        assert_eq!(crc.value(), 0x34);
        assert_eq!(crc.update(0x34), 0);
        crc.reset();
        assert_eq!(crc, OneWireCrc::default());
    }
}
